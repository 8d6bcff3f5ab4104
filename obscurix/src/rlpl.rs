use std::io::Write;

use obscurix_core::lexer::prelude::{Lexer, Token};

const PROMPT: &str = "obx> ";

pub fn start() -> std::io::Result<()> {
	let stdin = std::io::stdin();

	loop {
		let mut input = String::from("");

		print!("{}", PROMPT);
		std::io::stdout().flush()?;

		if stdin.read_line(&mut input)? == 0 {
			return Ok(());
		}

		let input = input.trim_end_matches(['\n', '\r']);

		match input {
			"" => {},
			".exit" => return Ok(()),
			_ => {
				let lexer = Lexer::new(input.char_indices().map(|(i, c)| (i as u32, c)));

				for res in lexer {
					match res {
						Ok((_, Token::Eof, _)) => break,
						Ok((start, token, end)) => {
							println!("{start:>4}..{end:<4} {token:?}");
						},
						Err(err) => {
							let (message, extra) = err.details();
							let (_, column) = err.location.line_col(input);

							println!("[col {column}] Lexical error: {message}");
							if !extra.is_empty() {
								println!("{}", extra.join("\n"));
							}
						}
					}
				}
			}
		}
	}
}
