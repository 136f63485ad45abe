use std::iter;

/// A single step of morse timing, measured in elements (one dit).
///
/// Dits and dahs carry their trailing one element of silence. Gaps only add
/// silence on top of that: a char gap after a dah gives the usual three
/// silent elements, a char gap plus a word gap gives seven.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Element {
    Dit,
    Dah,
    ElementGap,
    CharGap,
    WordGap,
    Silence,
}

impl Element {
    /// Elements of tone at the start of this step.
    pub fn on_units(self) -> usize {
        match self {
            Element::Dit => 1,
            Element::Dah => 3,
            Element::ElementGap | Element::CharGap | Element::WordGap | Element::Silence => 0,
        }
    }

    /// Elements of silence following the tone.
    pub fn off_units(self) -> usize {
        match self {
            Element::Dit | Element::Dah | Element::Silence => 1,
            Element::ElementGap | Element::CharGap => 2,
            Element::WordGap => 4,
        }
    }

    pub fn units(self) -> usize {
        self.on_units() + self.off_units()
    }
}

/// Expand a dot/dash string into timing elements.
///
/// Each space is two silent elements: a single space between letters is a
/// [`Element::CharGap`], a double space between words a [`Element::WordGap`].
/// Anything that is not a dot, dash or space is skipped.
pub fn parse(morse: &str) -> Vec<Element> {
    let mut elements = Vec::with_capacity(morse.len());
    let mut chars = morse.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '.' => elements.push(Element::Dit),
            '-' => elements.push(Element::Dah),
            ' ' => {
                let mut spaces = 1;
                while chars.next_if_eq(&' ').is_some() {
                    spaces += 1;
                }
                elements.extend(iter::repeat(Element::WordGap).take(spaces / 2));
                if spaces % 2 == 1 {
                    elements.push(Element::CharGap);
                }
            }
            _ => {}
        }
    }
    elements
}

/// Key state (`true` = tone) for every element of the sequence, in order.
pub fn keying(elements: &[Element]) -> impl Iterator<Item = bool> + '_ {
    elements.iter().flat_map(|element| {
        iter::repeat(true)
            .take(element.on_units())
            .chain(iter::repeat(false).take(element.off_units()))
    })
}

/// Total length of the sequence in elements.
pub fn total_units(elements: &[Element]) -> usize {
    elements.iter().map(|e| e.units()).sum()
}
