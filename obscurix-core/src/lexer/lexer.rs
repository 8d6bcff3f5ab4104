use super::error::{LexicalError, LexicalErrorType};
use super::token::{Token, COMMENT, RESULT_VAR, TEMP_VAR};
use std::fmt::Display;
use crate::utils::prelude::SrcSpan;
use log::debug;

pub type Spanned = (u32, Token, u32);
pub type LexResult = std::result::Result<Spanned, LexicalError>;

/// Lexes a whole source string, stopping at the first lexical error.
/// The returned sequence always ends with `Token::Eof`.
pub fn tokenize(src: &str) -> Result<Vec<Spanned>, LexicalError> {
	Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c))).collect()
}

fn is_connector(ch: char) -> bool {
	matches!(
		ch,
		'_' | '\u{203F}' | '\u{2040}' | '\u{2054}' | '\u{FE33}' | '\u{FE34}'
			| '\u{FE4D}'..='\u{FE4F}' | '\u{FF3F}'
	)
}

fn is_ident_start(ch: char) -> bool {
	ch.is_alphabetic() || is_connector(ch)
}

fn is_ident_continue(ch: char) -> bool {
	ch.is_alphanumeric() || is_connector(ch)
}

#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = (u32, char)>> {
	position: u32,
	next_position: u32,
	ch: Option<char>,
	next_ch: Option<char>,
	input: T,
	finished: bool,
}

impl<T: Iterator<Item = (u32, char)>> Display for Lexer<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f,
			"Lexer {{\n\tposition: {},\n\tnext_position: {},\n\tch: {:?}, next_ch: {:?}\n}}",
			self.position, self.next_position, self.ch, self.next_ch
		)
	}
}

impl<T: Iterator<Item = (u32, char)>> Lexer<T> {
	pub fn new(input: T) -> Self {
		let mut lexer = Self {
			position: 0,
			next_position: 0,
			ch: None,
			next_ch: None,
			input,
			finished: false,
		};

		lexer.next_char();
		lexer.next_char();

		lexer
	}

	pub fn next_token(&mut self) -> LexResult {
		while matches!(self.ch, Some(' ' | '\t' | '\x0C' | '\r')) {
			self.next_char();
		}

		let span = match self.ch {
			Some(ch) => match ch {
				COMMENT => return Ok(self.lex_comment()),
				'"' => return self.lex_string(),
				'λ' if self.next_ch == Some('!') => {
					let start_pos = self.position;
					self.next_char();
					self.next_char();

					(start_pos, Token::Throw, self.position)
				},
				RESULT_VAR | TEMP_VAR => self.eat_one_char(Token::Ident(ch.to_string())),
				'0'..='9' => return self.lex_number(),
				'-' if matches!(self.next_ch, Some('0'..='9')) => return self.lex_number(),
				'\n' => self.eat_one_char(Token::Newline),
				c => match Token::from_glyph(c) {
					Some(token) => self.eat_one_char(token),
					None if is_ident_start(c) => return Ok(self.lex_ident()),
					None => {
						let location = self.position;
						return Err(LexicalError {
							error: LexicalErrorType::UnrecognizedToken { tok: c },
							location: SrcSpan {
								start: location,
								end: location + c.len_utf8() as u32,
							},
						});
					}
				}
			},
			None => {
				let location = self.position;

				(location, Token::Eof, location)
			}
		};

		Ok(span)
	}

	fn next_char(&mut self) -> Option<char> {
		let ch = self.ch;

		let next = match self.input.next() {
			Some((pos, ch)) => {
				self.position = self.next_position;
				self.next_position = pos;

				Some(ch)
			},
			None => {
				self.position = self.next_position;
				self.next_position += self.next_ch.map_or(0, |ch| ch.len_utf8() as u32);

				None
			}
		};

		self.ch = self.next_ch;
		self.next_ch = next;

		ch
	}

	fn eat_one_char(&mut self, token: Token) -> Spanned {
		let start_pos = self.position;
		self.next_char();
		let end_pos = self.position;

		(start_pos, token, end_pos)
	}

	fn lex_ident(&mut self) -> Spanned {
		let start_pos = self.position;
		let mut ident = String::new();

		while let Some(ch) = self.ch {
			if !is_ident_continue(ch) {
				break;
			}

			ident.push(ch);
			self.next_char();
		}

		(start_pos, Token::Ident(ident), self.position)
	}

	fn lex_number(&mut self) -> LexResult {
		let start_pos = self.position;
		let mut value = String::new();
		let mut has_period = false;

		if self.ch == Some('-') {
			value.push('-');
			self.next_char();
		}

		loop {
			match self.ch {
				Some(ch) if ch.is_ascii_digit() => {
					value.push(ch);
					self.next_char();
				},
				Some('.') if has_period => {
					self.next_char();

					return Err(LexicalError {
						error: LexicalErrorType::MultipleFloatingPoints,
						location: SrcSpan::from(start_pos, self.position)
					});
				},
				Some('.') => {
					self.next_char();

					if !matches!(self.ch, Some('0'..='9')) {
						return Err(LexicalError {
							error: LexicalErrorType::MissingDigitAfterPeriod,
							location: SrcSpan::from(start_pos, self.position)
						});
					}

					has_period = true;
					value.push('.');
				},
				_ => break
			}
		}

		let end_pos = self.position;

		let token = if has_period {
			match value.parse::<f64>() {
				Ok(value) => Token::Float(value),
				Err(_) => return Err(LexicalError {
					error: LexicalErrorType::NumberTooLarge,
					location: SrcSpan::from(start_pos, end_pos)
				})
			}
		} else {
			match value.parse::<i64>() {
				Ok(value) => Token::Int(value),
				Err(_) => return Err(LexicalError {
					error: LexicalErrorType::NumberTooLarge,
					location: SrcSpan::from(start_pos, end_pos)
				})
			}
		};

		Ok((start_pos, token, end_pos))
	}

	fn lex_string(&mut self) -> LexResult {
		let start_pos = self.position;
		let mut value = String::new();

		self.next_char(); // skip quote

		loop {
			match self.ch {
				Some('"') => {
					self.next_char();
					break;
				},
				Some('\n') | None => {
					return Err(LexicalError {
						error: LexicalErrorType::MissingStringEnd,
						location: SrcSpan::from(start_pos, self.position)
					});
				},
				Some(ch) => {
					value.push(ch);
					self.next_char();
				}
			}
		}

		Ok((start_pos, Token::Str(value), self.position))
	}

	fn lex_comment(&mut self) -> Spanned {
		let start_pos = self.position;

		while !matches!(self.ch, Some('\n') | None) {
			self.next_char();
		}

		(start_pos, Token::Comment, self.position)
	}
}

impl<T: Iterator<Item = (u32, char)>> Iterator for Lexer<T> {
	type Item = LexResult;

	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}

		let token = self.next_token();

		match &token {
			Ok((start, tok, end)) => {
				debug!(target: "obscurix::lexer", "{start}..{end} {tok:?}");

				if *tok == Token::Eof {
					self.finished = true;
				}
			},
			Err(err) => {
				debug!(target: "obscurix::lexer", "{} {:?}", err.location, err.error);
				self.finished = true;
			}
		}

		Some(token)
	}
}
