//! Rule text compiler.
//!
//! Accepts the subset of ICU tailoring syntax a primary-strength engine can
//! honour:
//!
//! ```text
//! & z < æ < ø < å          # new primaries after z
//! & ss = ß                 # ß expands to the keys of "ss"
//! & h < ch                 # "ch" becomes a contraction
//! &[last primary ignorable] = '-'
//! [alternate non-ignorable]
//! [normalization off]
//! ```
//!
//! `<` assigns a fresh primary; `<<`, `<<<`, `<<<<`, `,`, `;` and `=` all
//! give the target the anchor's primaries, since nothing below primary
//! strength is modelled.

use crate::config::{Alternate, CollationSettings, Decomposition};
use crate::error::CollationError;
use crate::tailoring::Tailoring;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strength {
    Primary,
    Secondary,
    Tertiary,
    Quaternary,
    Identical,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Reset,
    Relation(Strength),
    Text(String),
    Bracket(String),
}

const SYNTAX: &[char] = &[
    '&', '<', '=', ',', ';', '[', ']', '#', '/', '|', '!', '@', '*',
];

/// Compiles `rules`, applying any `[...]` settings to `settings`.
pub(crate) fn compile(
    rules: &str,
    settings: &mut CollationSettings,
) -> Result<Tailoring, CollationError> {
    let tokens = Lexer::new(rules).tokenize()?;
    let mut tailoring = Tailoring::new();
    let mut anchor: Option<Vec<u32>> = None;
    let mut tokens = tokens.into_iter();

    while let Some((position, token)) = tokens.next() {
        match token {
            Token::Reset => {
                let primaries = match tokens.next() {
                    Some((_, Token::Text(text))) => tailoring.primaries_of(&text, *settings),
                    Some((_, Token::Bracket(reset_to))) => {
                        check_reset_position(&reset_to)?;
                        Vec::new()
                    }
                    _ => {
                        return Err(CollationError::MissingText {
                            after: "reset",
                            position,
                        })
                    }
                };
                anchor = Some(primaries);
            }
            Token::Relation(strength) => {
                let Some(current) = anchor.as_ref() else {
                    return Err(CollationError::RelationWithoutReset { position });
                };
                let Some((_, Token::Text(target))) = tokens.next() else {
                    return Err(CollationError::MissingText {
                        after: "relation",
                        position,
                    });
                };
                let primaries = match strength {
                    Strength::Primary => vec![tailoring.allocate()?],
                    Strength::Secondary
                    | Strength::Tertiary
                    | Strength::Quaternary
                    | Strength::Identical => current.clone(),
                };
                tailoring.insert(&target, primaries.clone());
                anchor = Some(primaries);
            }
            Token::Bracket(option) => apply_setting(&option, settings)?,
            Token::Text(_) => return Err(CollationError::UnexpectedText { position }),
        }
    }

    Ok(tailoring)
}

fn check_reset_position(position: &str) -> Result<(), CollationError> {
    let words: Vec<String> = position
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect();
    match words.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["first" | "last", "primary" | "secondary" | "tertiary", "ignorable"] => Ok(()),
        _ => Err(CollationError::UnknownOption(position.to_string())),
    }
}

fn apply_setting(option: &str, settings: &mut CollationSettings) -> Result<(), CollationError> {
    let words: Vec<String> = option
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect();
    match words.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["alternate", "shifted"] => settings.alternate = Alternate::Shifted,
        ["alternate", "non-ignorable"] => settings.alternate = Alternate::NonIgnorable,
        ["normalization", "on"] => settings.decomposition = Decomposition::Canonical,
        ["normalization", "off"] => settings.decomposition = Decomposition::None,
        // Only primary strength is modelled.
        ["strength", "1" | "2" | "3" | "4" | "i"] => {}
        _ => return Err(CollationError::UnknownOption(option.to_string())),
    }
    Ok(())
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn new(rules: &str) -> Self {
        Self {
            chars: rules.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn tokenize(mut self) -> Result<Vec<(usize, Token)>, CollationError> {
        let mut tokens = Vec::new();
        while let Some(ch) = self.peek() {
            let start = self.pos;
            match ch {
                c if c.is_whitespace() => self.pos += 1,
                '#' => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.pos += 1;
                    }
                }
                '&' => {
                    self.pos += 1;
                    tokens.push((start, Token::Reset));
                }
                '<' => {
                    let mut depth = 0;
                    while depth < 4 && self.peek() == Some('<') {
                        depth += 1;
                        self.pos += 1;
                    }
                    let strength = match depth {
                        1 => Strength::Primary,
                        2 => Strength::Secondary,
                        3 => Strength::Tertiary,
                        _ => Strength::Quaternary,
                    };
                    tokens.push((start, Token::Relation(strength)));
                    self.reject_star()?;
                }
                '=' | ',' | ';' => {
                    self.pos += 1;
                    let strength = match ch {
                        ',' => Strength::Secondary,
                        ';' => Strength::Tertiary,
                        _ => Strength::Identical,
                    };
                    tokens.push((start, Token::Relation(strength)));
                    self.reject_star()?;
                }
                '[' => {
                    let option = self.bracket()?;
                    tokens.push((start, Token::Bracket(option)));
                }
                c if SYNTAX.contains(&c) => {
                    return Err(CollationError::UnsupportedSyntax {
                        symbol: c,
                        position: start,
                    })
                }
                _ => {
                    let text = self.text()?;
                    tokens.push((start, Token::Text(text)));
                }
            }
        }
        Ok(tokens)
    }

    fn reject_star(&self) -> Result<(), CollationError> {
        match self.peek() {
            Some('*') => Err(CollationError::UnsupportedSyntax {
                symbol: '*',
                position: self.pos,
            }),
            _ => Ok(()),
        }
    }

    fn bracket(&mut self) -> Result<String, CollationError> {
        let start = self.pos;
        self.pos += 1;
        let mut option = String::new();
        loop {
            match self.peek() {
                Some(']') => {
                    self.pos += 1;
                    return Ok(option.trim().to_string());
                }
                Some(c) => {
                    option.push(c);
                    self.pos += 1;
                }
                None => return Err(CollationError::UnterminatedBracket { position: start }),
            }
        }
    }

    /// Reads one text operand: bare characters, quoted runs and escapes, up
    /// to the next whitespace or syntax character.
    fn text(&mut self) -> Result<String, CollationError> {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || SYNTAX.contains(&ch) {
                break;
            }
            match ch {
                '\'' => self.quoted(&mut text)?,
                '\\' => text.push(self.escape()?),
                _ => {
                    text.push(ch);
                    self.pos += 1;
                }
            }
        }
        Ok(text)
    }

    fn quoted(&mut self, text: &mut String) -> Result<(), CollationError> {
        let start = self.pos;
        self.pos += 1;
        if self.peek() == Some('\'') {
            self.pos += 1;
            text.push('\'');
            return Ok(());
        }
        loop {
            match self.peek() {
                Some('\'') if self.chars.get(self.pos + 1) == Some(&'\'') => {
                    text.push('\'');
                    self.pos += 2;
                }
                Some('\'') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(c) => {
                    text.push(c);
                    self.pos += 1;
                }
                None => return Err(CollationError::UnterminatedQuote { position: start }),
            }
        }
    }

    fn escape(&mut self) -> Result<char, CollationError> {
        let start = self.pos;
        self.pos += 1;
        let Some(ch) = self.peek() else {
            return Err(CollationError::InvalidEscape {
                position: start,
                reason: "escape at end of rules".to_string(),
            });
        };
        self.pos += 1;
        if ch != 'u' {
            return Ok(ch);
        }

        let digits: String = self.chars.iter().skip(self.pos).take(4).collect();
        if digits.len() != 4 {
            return Err(CollationError::InvalidEscape {
                position: start,
                reason: format!("expected four hex digits, found '{digits}'"),
            });
        }
        let escaped = u32::from_str_radix(&digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| CollationError::InvalidEscape {
                position: start,
                reason: format!("'{digits}' is not a valid code point"),
            })?;
        self.pos += 4;
        Ok(escaped)
    }
}
