use crate::error::{MorseError, MorseResult};
use crate::synth::SampleBuffer;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const FORMAT_PCM: u16 = 1;
pub const BITS_PER_SAMPLE: u16 = 16;
pub const FMT_CHUNK_SIZE: u32 = 16;
pub const HEADER_SIZE: u64 = 44;

/// RIFF/WAVE header for 16-bit PCM. Every field is derived from the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    channels: u16,
    sample_rate: u32,
    byte_rate: u32,
    data_size: u32,
}

impl WavHeader {
    pub fn for_buffer(buffer: &SampleBuffer) -> MorseResult<WavHeader> {
        let channels = buffer.channel_mode().channels();
        let block_align = BITS_PER_SAMPLE * channels / 8;
        let byte_rate = buffer
            .sample_rate()
            .checked_mul(block_align as u32)
            .ok_or(MorseError::InvalidSampleRate {
                rate: buffer.sample_rate(),
            })?;
        let bytes = buffer.frames() as u64 * block_align as u64;
        // RIFF size must fit as well as the data size
        if bytes + HEADER_SIZE - 8 > u32::MAX as u64 {
            return Err(MorseError::DataTooLarge { bytes });
        }
        Ok(WavHeader {
            channels,
            sample_rate: buffer.sample_rate(),
            byte_rate,
            data_size: bytes as u32,
        })
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn block_align(&self) -> u16 {
        BITS_PER_SAMPLE * self.channels / 8
    }

    pub fn byte_rate(&self) -> u32 {
        self.byte_rate
    }

    pub fn data_size(&self) -> u32 {
        self.data_size
    }

    /// "WAVE" tag, fmt chunk and data chunk.
    pub fn riff_size(&self) -> u32 {
        4 + (8 + FMT_CHUNK_SIZE) + (8 + self.data_size)
    }

    pub fn file_size(&self) -> u64 {
        8 + self.riff_size() as u64
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(b"RIFF")?;
        writer.write_all(&self.riff_size().to_le_bytes())?;
        writer.write_all(b"WAVE")?;

        writer.write_all(b"fmt ")?;
        writer.write_all(&FMT_CHUNK_SIZE.to_le_bytes())?;
        writer.write_all(&FORMAT_PCM.to_le_bytes())?;
        writer.write_all(&self.channels.to_le_bytes())?;
        writer.write_all(&self.sample_rate.to_le_bytes())?;
        writer.write_all(&self.byte_rate().to_le_bytes())?;
        writer.write_all(&self.block_align().to_le_bytes())?;
        writer.write_all(&BITS_PER_SAMPLE.to_le_bytes())?;

        writer.write_all(b"data")?;
        writer.write_all(&self.data_size.to_le_bytes())?;
        Ok(())
    }
}

/// Write a complete wav stream, returning the number of bytes written.
pub fn write_wav<W: Write>(writer: &mut W, buffer: &SampleBuffer) -> MorseResult<u64> {
    let header = WavHeader::for_buffer(buffer)?;
    header.write_to(writer)?;
    for sample in buffer.samples() {
        writer.write_all(&sample.to_le_bytes())?;
    }
    Ok(header.file_size())
}

pub fn to_bytes(buffer: &SampleBuffer) -> MorseResult<Vec<u8>> {
    let mut bytes = Vec::with_capacity(HEADER_SIZE as usize + buffer.samples().len() * 2);
    write_wav(&mut bytes, buffer)?;
    Ok(bytes)
}

/// Write a wav file so that `path` either holds the complete file or is untouched.
///
/// The data goes to a temporary file next to `path` which is renamed over it
/// once fully written and synced.
pub fn write_wav_file(path: &Path, buffer: &SampleBuffer) -> MorseResult<u64> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    let size = {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let size = write_wav(&mut writer, buffer)?;
        writer.flush()?;
        size
    };
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| MorseError::Io(e.error))?;
    log::debug!("wrote {size} bytes to {}", path.display());
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{synthesize, ChannelMode, ToneSettings};
    use crate::timing::parse;
    use pretty_assertions::assert_eq;
    use std::fs::File;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    fn buffer(morse: &str, channels: ChannelMode) -> SampleBuffer {
        let settings = ToneSettings::new(880., 20., 8000, channels).unwrap();
        synthesize(&parse(morse), &settings).unwrap()
    }

    #[test]
    fn empty_buffer_is_header_only() {
        let bytes = to_bytes(&SampleBuffer::new(ChannelMode::Mono, 44100)).unwrap();
        assert_eq!(bytes.len(), 44);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(u32_at(&bytes, 4), 36);
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32_at(&bytes, 40), 0);
    }

    #[test]
    fn stereo_header_fields() {
        let buffer = buffer(".-", ChannelMode::Stereo);
        let bytes = to_bytes(&buffer).unwrap();
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(u32_at(&bytes, 16), 16);
        assert_eq!(u16_at(&bytes, 20), 1);
        assert_eq!(u16_at(&bytes, 22), 2);
        assert_eq!(u32_at(&bytes, 24), 8000);
        assert_eq!(u32_at(&bytes, 28), 32000);
        assert_eq!(u16_at(&bytes, 32), 4);
        assert_eq!(u16_at(&bytes, 34), 16);
        assert_eq!(u32_at(&bytes, 40) as usize, buffer.frames() * 4);
    }

    #[test]
    fn byte_rate_overflow_is_rejected() {
        let buffer = SampleBuffer::new(ChannelMode::Stereo, 3_000_000_000);
        assert!(matches!(
            to_bytes(&buffer),
            Err(MorseError::InvalidSampleRate {
                rate: 3_000_000_000
            })
        ));
        let buffer = SampleBuffer::new(ChannelMode::Mono, 2_000_000_000);
        let header = WavHeader::for_buffer(&buffer).unwrap();
        assert_eq!(header.byte_rate(), 4_000_000_000);
    }

    #[test]
    fn sizes_match_bytes_written() {
        for channels in [ChannelMode::Mono, ChannelMode::Stereo] {
            let buffer = buffer("... --- ...", channels);
            let bytes = to_bytes(&buffer).unwrap();
            let header = WavHeader::for_buffer(&buffer).unwrap();
            assert_eq!(u32_at(&bytes, 4) as usize, bytes.len() - 8);
            assert_eq!(header.file_size() as usize, bytes.len());
            assert_eq!(
                u32_at(&bytes, 40) as usize,
                buffer.frames() * header.block_align() as usize
            );
        }
    }

    #[test]
    fn samples_are_little_endian() {
        let buffer = buffer(".", ChannelMode::Mono);
        let bytes = to_bytes(&buffer).unwrap();
        let second = buffer.samples()[1];
        assert_eq!(&bytes[46..48], &second.to_le_bytes());
    }

    #[test]
    fn serializing_twice_is_identical() {
        let buffer = buffer("-.-.", ChannelMode::Stereo);
        assert_eq!(to_bytes(&buffer).unwrap(), to_bytes(&buffer).unwrap());
    }

    #[test]
    fn file_readable_by_wav_crate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let buffer = buffer(".-.", ChannelMode::Stereo);
        let size = write_wav_file(&path, &buffer).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), size);

        let mut file = File::open(&path).unwrap();
        let (header, data) = wav::read(&mut file).unwrap();
        assert_eq!(header.channel_count, 2);
        assert_eq!(header.sampling_rate, 8000);
        assert_eq!(header.bits_per_sample, 16);
        match data {
            wav::BitDepth::Sixteen(samples) => assert_eq!(samples, buffer.samples()),
            _ => panic!("expected 16-bit samples"),
        }
    }

    #[test]
    fn overwrites_existing_file_and_leaves_no_temporaries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        fs::write(&path, b"old").unwrap();
        write_wav_file(&path, &buffer(".", ChannelMode::Mono)).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn failed_write_keeps_target_untouched() {
        let dir = tempfile::tempdir().unwrap();
        // a directory can't be replaced by the temporary file
        let path = dir.path().join("taken");
        fs::create_dir(&path).unwrap();
        let result = write_wav_file(&path, &buffer(".", ChannelMode::Mono));
        assert!(matches!(result, Err(MorseError::Io(_))));
        assert!(path.is_dir());
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
