use super::prelude::{tokenize, Lexer, LexicalError, LexicalErrorType, Token};

fn ident(name: &str) -> Token {
    Token::Ident(String::from(name))
}

#[test]
fn test_numbers() -> std::result::Result<(), LexicalError> {
    let input = r#"
        10
        0
        -1
        1.5
        -0.25
        9223372036854775807
    "#;

    let mut lexer = Lexer::new(input.char_indices().map(|(i, c)| (i as u32, c)));

    let tokens = vec![
        Token::Newline,
        Token::Int(10),
        Token::Newline,
        Token::Int(0),
        Token::Newline,
        Token::Int(-1),
        Token::Newline,
        Token::Float(1.5),
        Token::Newline,
        Token::Float(-0.25),
        Token::Newline,
        Token::Int(i64::MAX),
        Token::Newline,
        Token::Eof,
    ];

    for (idx, token) in tokens.iter().enumerate() {
        let (_, next_token, _) = match lexer.next_token() {
            Ok(next_token) => next_token,
            Err(err) => {
                println!("stopped at {token:?} ({idx})");
                panic!("{err:?}")
            }
        };

        assert_eq!(
            *token, next_token,
            "Next token does not match expected token ({:?}, {:?}) at {}",
            next_token, token, idx
        );
    }

    Ok(())
}

#[test]
fn test_invalid_input() {
    let fails = vec![
        ("1.2.3", LexicalErrorType::MultipleFloatingPoints),
        ("7.", LexicalErrorType::MissingDigitAfterPeriod),
        ("99999999999999999999", LexicalErrorType::NumberTooLarge),
        ("\"never closed", LexicalErrorType::MissingStringEnd),
        ("\"split\nstring\"", LexicalErrorType::MissingStringEnd),
        ("x ≔ 1 $ 2", LexicalErrorType::UnrecognizedToken { tok: '$' }),
        ("- 1", LexicalErrorType::UnrecognizedToken { tok: '-' }),
    ];

    for (input, fail) in fails {
        match tokenize(input) {
            Err(err) => assert_eq!(fail, err.error, "wrong error for {input:?}"),
            Ok(tokens) => panic!("Expected {fail:?} for {input:?} but got Ok({tokens:?})"),
        }
    }
}

#[test]
fn test_glyphs() -> std::result::Result<(), LexicalError> {
    let input = "⥀⥁↜?⇒⇏↯⛌⎁⎎⍰≔⊞⊖§*λ!⎋≺≡";

    let tokens = tokenize(input)?
        .into_iter()
        .map(|(_, token, _)| token)
        .collect::<Vec<Token>>();

    assert_eq!(tokens, vec![
        Token::FuncStart,
        Token::FuncEnd,
        Token::IfStart,
        Token::IfCond,
        Token::Then,
        Token::Else,
        Token::IfEnd,
        Token::TryStart,
        Token::Catch,
        Token::Finally,
        Token::TryEnd,
        Token::Assign,
        Token::Plus,
        Token::Minus,
        Token::Call,
        Token::Print,
        Token::Throw,
        Token::Return,
        Token::LessThan,
        Token::Equal,
        Token::Eof,
    ]);

    Ok(())
}

#[test]
fn test_unicode_identifiers() -> std::result::Result<(), LexicalError> {
    let input = "ε résultat число x_1 λ λx ⍟⍡ a‿b";

    let tokens = tokenize(input)?
        .into_iter()
        .map(|(_, token, _)| token)
        .collect::<Vec<Token>>();

    assert_eq!(tokens, vec![
        ident("ε"),
        ident("résultat"),
        ident("число"),
        ident("x_1"),
        ident("λ"),
        ident("λx"),
        ident("⍟"),
        ident("⍡"),
        ident("a‿b"),
        Token::Eof,
    ]);

    Ok(())
}

#[test]
fn test_input() -> std::result::Result<(), LexicalError> {
    let input = r#"※ sums two numbers
⥀ §sum_safe a b
    ↜ ? a ≺ 0 ⇒
        λ! "negative parameter"
    ↯
    ⎋ a ⊞ b
⥁
*"start"
"#;

    let mut lexer = Lexer::new(input.char_indices().map(|(i, c)| (i as u32, c)));

    let tokens = vec![
        Token::Comment,
        Token::Newline,

        Token::FuncStart,
        Token::Call,
        ident("sum_safe"),
        ident("a"),
        ident("b"),
        Token::Newline,

        Token::IfStart,
        Token::IfCond,
        ident("a"),
        Token::LessThan,
        Token::Int(0),
        Token::Then,
        Token::Newline,

        Token::Throw,
        Token::Str(String::from("negative parameter")),
        Token::Newline,

        Token::IfEnd,
        Token::Newline,

        Token::Return,
        ident("a"),
        Token::Plus,
        ident("b"),
        Token::Newline,

        Token::FuncEnd,
        Token::Newline,

        Token::Print,
        Token::Str(String::from("start")),
        Token::Newline,
        Token::Eof,
    ];

    for (idx, token) in tokens.iter().enumerate() {
        let (_, next_token, _) = match lexer.next_token() {
            Ok(next_token) => next_token,
            Err(err) => {
                println!("stopped at {token:?} ({idx})");
                panic!("{err:?}")
            }
        };

        assert_eq!(
            *token, next_token,
            "Next token does not match expected token ({:?}, {:?}) at {}",
            next_token, token, idx
        );
    }

    Ok(())
}

#[test]
fn test_spans_are_byte_offsets() -> std::result::Result<(), LexicalError> {
    let input = "ε ≔ \"ok\"";

    let spans = tokenize(input)?
        .into_iter()
        .map(|(start, _, end)| (start, end))
        .collect::<Vec<(u32, u32)>>();

    // ε and ≔ are two and three bytes wide
    assert_eq!(spans, vec![(0, 2), (3, 6), (7, 11), (11, 11)]);

    Ok(())
}

#[test]
fn test_lexer_is_fused_after_eof() {
    let mut lexer = Lexer::new("".char_indices().map(|(i, c)| (i as u32, c)));

    assert!(matches!(lexer.next(), Some(Ok((0, Token::Eof, 0)))));
    assert!(lexer.next().is_none());
}

#[test]
fn test_restartable() -> std::result::Result<(), LexicalError> {
    let input = "x ≔ 5 ⊞ 10";

    assert_eq!(tokenize(input)?, tokenize(input)?);

    Ok(())
}
