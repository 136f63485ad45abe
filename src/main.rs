//! Convert text to morse code, binary or hex morse, beeps and wav files.
use clap::{Parser, Subcommand};
use morse::beep::{self, TerminalBeeper};
use morse::code::{self, HexAlphabet};
use morse::synth::{self, ChannelMode, ToneSettings};
use morse::{default_output_path, render_wav, RenderConfig};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
    /// Tone frequency in Hz, kept between 37 and 8000
    #[arg(long, global = true, default_value_t = 880.)]
    hz: f64,
    /// Words per minute
    #[arg(long, global = true, default_value_t = 16.)]
    wpm: f64,
    /// Samples per second of the wav file
    #[arg(long, global = true, default_value_t = 44100)]
    sps: u32,
    /// Output wav file (default: morse<timestamp>.wav)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
    /// Print the wav summary as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    /// Measure the tone of the rendered wav
    #[arg(long, global = true, default_value_t = false)]
    analyze: bool,
    /// Print each step while rendering a wav
    #[arg(long, global = true, default_value_t = false)]
    progress: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Text to dot/dash morse
    Encode { text: Vec<String> },
    /// Text to binary morse
    Binary { text: Vec<String> },
    /// Dot/dash or binary morse to text
    Decode {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        morse: Vec<String>,
    },
    /// Text to hex morse (2E 2D 20)
    Hex { text: Vec<String> },
    /// Hex morse (2E 2D 20) to text
    HexDecode { hex: Vec<String> },
    /// Text to hex binary morse (30 31 20)
    HexBin { text: Vec<String> },
    /// Hex binary morse (30 31 20) to text
    HexBinDecode { hex: Vec<String> },
    /// Sound text on the terminal bell
    Beep { text: Vec<String> },
    /// Write text as a morse wav file
    Wav {
        /// One channel instead of two
        #[arg(long, default_value_t = false)]
        mono: bool,
        text: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();
    match &args.command {
        Some(command) => run(command, &args),
        None => interactive(&args),
    }
}

fn run(command: &Command, args: &Args) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Encode { text } => println!("{}", code::encode(&text.join(" "))),
        Command::Binary { text } => println!("{}", code::encode_binary(&text.join(" "))),
        Command::Decode { morse } => println!("{}", code::decode(&morse.join(" "))?),
        Command::Hex { text } => {
            println!("{}", code::encode_hex(&text.join(" "), HexAlphabet::Morse))
        }
        Command::HexDecode { hex } => {
            println!("{}", code::decode_hex(&hex.join(" "), HexAlphabet::Morse)?)
        }
        Command::HexBin { text } => {
            println!("{}", code::encode_hex(&text.join(" "), HexAlphabet::Binary))
        }
        Command::HexBinDecode { hex } => {
            println!("{}", code::decode_hex(&hex.join(" "), HexAlphabet::Binary)?)
        }
        Command::Beep { text } => sound(&text.join(" "), args)?,
        Command::Wav { mono, text } => {
            let channels = if *mono {
                ChannelMode::Mono
            } else {
                ChannelMode::Stereo
            };
            write_wav(&text.join(" "), channels, args)?
        }
    }
    Ok(())
}

fn print_speed(args: &Args) -> f64 {
    let tone_hz = synth::clamp_tone(args.hz);
    println!(
        "-wpm: {} ({} ms)",
        args.wpm,
        code::element_millis(args.wpm)
    );
    println!("-hz: {tone_hz} Hz (tone)");
    tone_hz
}

fn sound(text: &str, args: &Args) -> Result<(), Box<dyn Error>> {
    let tone_hz = print_speed(args);
    let morse = code::encode(code::limit_input(text));
    println!("{morse}");
    println!("tone: {tone_hz:9.3} Hz (--hz {tone_hz})");
    println!("code: {:9.3} Hz (--wpm {})", args.wpm / 1.2, args.wpm);
    let mut beeper = TerminalBeeper::new(io::stdout());
    beep::play(&morse, tone_hz, args.wpm, &mut beeper)?;
    Ok(())
}

fn write_wav(text: &str, channels: ChannelMode, args: &Args) -> Result<(), Box<dyn Error>> {
    let tone_hz = print_speed(args);
    let morse = code::encode(code::limit_input(text));
    println!("{morse}");
    let settings = ToneSettings::new(tone_hz, args.wpm, args.sps, channels)?;
    println!("wave: {:9.3} Hz (--sps {})", args.sps as f64, args.sps);
    println!("tone: {tone_hz:9.3} Hz (--hz {tone_hz})");
    println!(
        "code: {:9.3} Hz (--wpm {})",
        settings.elements_per_second(),
        args.wpm
    );
    let output = args.output.clone().unwrap_or_else(default_output_path);
    let mut config = RenderConfig::new(settings, &output, args.progress);
    config.analyze = args.analyze;
    let summary = render_wav(&morse, &config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    println!(
        "{} PCM samples ({:.1} s @ {:.1} kHz) written to {} ({:.1} kB)",
        summary.pcm_count,
        summary.duration_seconds,
        summary.sample_rate as f64 / 1e3,
        summary.path.display(),
        summary.size_bytes as f64 / 1024.
    );
    if let Some(tone) = summary.measured_tone_hz {
        println!("measured tone: {tone:.1} Hz");
    }
    Ok(())
}

fn prompt(message: &str) -> io::Result<String> {
    println!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn interactive(args: &Args) -> Result<(), Box<dyn Error>> {
    println!("MORSE (see --help for the command line version)");
    println!("morse table:");
    println!("ABC DEFGHIJKLMNOPQRSTUVWXYZ 12 34567 890 ! $ ' \" (), . _ - / : ; = ? @");
    println!("morse actions:");
    println!("0 [encode with sound], 1 [encode with stereo sound to wav file]");
    println!("2 [encode with mono sound to wav file], 3 [encode], 4 [binary encode]");
    println!("5 [decode morse/binary], 6 [hexa encode], 7 [hexa decode]");
    println!("8 [hexa bin encode], 9 [hexa bin decode]");
    let choice = prompt("choose action 0-9 and press [enter]:")?;
    let action = match choice.trim().parse::<u8>() {
        Ok(n) if n <= 9 => n,
        _ => {
            println!("wrong input, action 3 is active now");
            3
        }
    };
    let input = prompt("type or paste input and press [enter]")?;
    let text = vec![input];
    let command = match action {
        0 => Command::Beep { text },
        1 => Command::Wav { mono: false, text },
        2 => Command::Wav { mono: true, text },
        4 => Command::Binary { text },
        5 => Command::Decode { morse: text },
        6 => Command::Hex { text },
        7 => Command::HexDecode { hex: text },
        8 => Command::HexBin { text },
        9 => Command::HexBinDecode { hex: text },
        _ => Command::Encode { text },
    };
    run(&command, args)
}
