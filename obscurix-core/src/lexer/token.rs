pub const FUNC_START: char = '⥀';
pub const FUNC_END: char = '⥁';
pub const IF_START: char = '↜';
pub const IF_COND: char = '?';
pub const IF_THEN: char = '⇒';
pub const IF_ELSE: char = '⇏';
pub const IF_END: char = '↯';
pub const TRY_START: char = '⛌';
pub const CATCH: char = '⎁';
pub const FINALLY: char = '⎎';
pub const TRY_END: char = '⍰';
pub const ASSIGN: char = '≔';
pub const ADD: char = '⊞';
pub const SUB: char = '⊖';
pub const CALL: char = '§';
pub const PRINT: char = '*';
pub const THROW: &str = "λ!";
pub const RETURN: char = '⎋';
pub const LT: char = '≺';
pub const EQ: char = '≡';
pub const COMMENT: char = '※';
pub const RESULT_VAR: char = '⍟';
pub const TEMP_VAR: char = '⍡';

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // <буква>{<буква>|<цифра>|_}
    Ident(String),
    Int(i64),
    Float(f64),
    // "..." without escapes
    Str(String),
    // ※ up to end of line
    Comment,

    // Блоки
    FuncStart, // ⥀
    FuncEnd, // ⥁
    IfStart, // ↜
    IfCond, // ?
    Then, // ⇒
    Else, // ⇏
    IfEnd, // ↯
    TryStart, // ⛌
    Catch, // ⎁
    Finally, // ⎎
    TryEnd, // ⍰

    // Команды
    Assign, // ≔
    Call, // §
    Print, // *
    Throw, // λ!
    Return, // ⎋

    // Операции
    Plus, // ⊞
    Minus, // ⊖
    LessThan, // ≺
    Equal, // ≡

    Newline,
    Eof,
}

impl Token {
    pub fn from_glyph(ch: char) -> Option<Token> {
        Some(match ch {
            FUNC_START => Token::FuncStart,
            FUNC_END => Token::FuncEnd,
            IF_START => Token::IfStart,
            IF_COND => Token::IfCond,
            IF_THEN => Token::Then,
            IF_ELSE => Token::Else,
            IF_END => Token::IfEnd,
            TRY_START => Token::TryStart,
            CATCH => Token::Catch,
            FINALLY => Token::Finally,
            TRY_END => Token::TryEnd,
            ASSIGN => Token::Assign,
            ADD => Token::Plus,
            SUB => Token::Minus,
            CALL => Token::Call,
            PRINT => Token::Print,
            RETURN => Token::Return,
            LT => Token::LessThan,
            EQ => Token::Equal,
            _ => return None
        })
    }

    pub fn is_reserved_word(&self) -> bool {
        matches!(
            self,
            Token::FuncStart
            | Token::FuncEnd
            | Token::IfStart
            | Token::IfCond
            | Token::Then
            | Token::Else
            | Token::IfEnd
            | Token::TryStart
            | Token::Catch
            | Token::Finally
            | Token::TryEnd
            | Token::Call
            | Token::Print
            | Token::Throw
            | Token::Return
        )
    }

    /// Glyphs that close a block or start one of its trailing clauses.
    pub fn is_block_end(&self) -> bool {
        matches!(
            self,
            Token::FuncEnd
            | Token::Else
            | Token::IfEnd
            | Token::Catch
            | Token::Finally
            | Token::TryEnd
        )
    }

    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            Token::Ident(_) | Token::Int(_) | Token::Float(_) | Token::Str(_)
        )
    }

    pub fn as_literal(&self) -> String {
        match self {
            Token::Ident(value) => value.to_string(),
            Token::Int(value) => value.to_string(),
            Token::Float(value) => float_literal(*value),
            Token::Str(value) => format!("\"{value}\""),
            Token::Comment => COMMENT.to_string(),

            Token::FuncStart => FUNC_START.to_string(),
            Token::FuncEnd => FUNC_END.to_string(),
            Token::IfStart => IF_START.to_string(),
            Token::IfCond => IF_COND.to_string(),
            Token::Then => IF_THEN.to_string(),
            Token::Else => IF_ELSE.to_string(),
            Token::IfEnd => IF_END.to_string(),
            Token::TryStart => TRY_START.to_string(),
            Token::Catch => CATCH.to_string(),
            Token::Finally => FINALLY.to_string(),
            Token::TryEnd => TRY_END.to_string(),

            Token::Assign => ASSIGN.to_string(),
            Token::Call => CALL.to_string(),
            Token::Print => PRINT.to_string(),
            Token::Throw => THROW.to_string(),
            Token::Return => RETURN.to_string(),

            Token::Plus => ADD.to_string(),
            Token::Minus => SUB.to_string(),
            Token::LessThan => LT.to_string(),
            Token::Equal => EQ.to_string(),

            Token::Newline => "\n".to_string(),
            Token::Eof => "\0".to_string(),
        }
    }

    /// Human readable name used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(value) => format!("the identifier `{value}`"),
            Token::Int(_) => "an Int".to_string(),
            Token::Float(_) => "a Float".to_string(),
            Token::Str(_) => "a String".to_string(),
            Token::Newline => "a line break".to_string(),
            Token::Eof => "the end of file".to_string(),
            _ if self.is_reserved_word() => format!("the keyword `{}`", self.as_literal()),
            _ => format!("`{}`", self.as_literal())
        }
    }
}

/// Plain decimal form of `value` that always has a `.`, so it lexes back
/// as the same Float.
pub fn float_literal(value: f64) -> String {
    let text = value.to_string();

    if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}
