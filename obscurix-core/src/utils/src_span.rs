use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SrcSpan {
    pub start: u32,
    pub end: u32,
}

impl SrcSpan {
	pub fn from(start: u32, end: u32) -> Self {
		Self { start, end }
	}

	pub fn merge(self, other: SrcSpan) -> Self {
		Self { start: self.start.min(other.start), end: self.end.max(other.end) }
	}

	/// One-based line and column of `start` inside `src`.
	pub fn line_col(&self, src: &str) -> (usize, usize) {
		let offset = (self.start as usize).min(src.len());
		let before = src.get(..offset).unwrap_or(src);

		let line = before.matches('\n').count() + 1;
		let column = match before.rfind('\n') {
			Some(idx) => before[idx + 1..].chars().count() + 1,
			None => before.chars().count() + 1,
		};

		(line, column)
	}
}

impl Display for SrcSpan {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}..{}", self.start, self.end)
	}
}
