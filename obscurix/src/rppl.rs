use std::io::Write;

use obscurix_core::parser::prelude::{parse_module_from_stream, ParseErrorType};

const PROMPT: &str = "obx> ";
const CONTINUATION: &str = "...  ";

pub fn start() -> std::io::Result<()> {
	let stdin = std::io::stdin();
	let mut source = String::new();

	loop {
		let mut input = String::from("");

		print!("{}", if source.is_empty() { PROMPT } else { CONTINUATION });
		std::io::stdout().flush()?;

		if stdin.read_line(&mut input)? == 0 {
			return Ok(());
		}

		let line = input.trim_end_matches(['\n', '\r']);

		match line {
			"" if source.is_empty() => continue,
			".exit" => return Ok(()),
			_ => {
				source.push_str(line);
				source.push('\n');
			}
		}

		match parse_module_from_stream(source.chars()) {
			Ok(parsed) => {
				println!("{}", parsed.module.program);
				source.clear();
			},
			// blocks may span several lines, keep reading until they close
			Err(err) if matches!(err.error, ParseErrorType::MissingClosing { .. }) && !line.is_empty() => {},
			Err(err) => {
				let (message, messages) = err.details();
				let (line, column) = err.span.line_col(&source);

				println!("[{line}:{column}] Parse error: {}.\n\t{}", message, messages.join(";\n\t"));
				source.clear();
			}
		}
	}
}
