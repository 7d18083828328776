//! End-to-end tokenizer tests over realistic Jack snippets.

use jack_tokenizer::{TokenKind, TokenValue, Tokenizer};

#[test]
fn tokenizes_a_small_class_declaration() {
    let src = r#"
        class Main {
            static int count;

            function void main() {
                var Array a;
                let a = Array.new(10);
                do Output.printString("done");
                return;
            }
        }
    "#;
    let tokens = Tokenizer::new(src).tokenize_all().unwrap();

    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds[0], TokenKind::Keyword); // class
    assert_eq!(kinds[1], TokenKind::Ident); // Main
    assert_eq!(kinds[2], TokenKind::Symbol); // {

    let string_tok = tokens
        .iter()
        .find(|t| matches!(t.value, TokenValue::StringConst(_)))
        .unwrap();
    assert_eq!(
        string_tok.value,
        TokenValue::StringConst("done".to_string())
    );

    let ints: Vec<&jack_tokenizer::Token> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::IntConst)
        .collect();
    assert_eq!(ints.len(), 1);
    assert_eq!(ints[0].value, TokenValue::IntConst(10));
}

#[test]
fn mixed_comments_and_whitespace_do_not_produce_spurious_tokens() {
    let src = "// header comment\n/* block\n   spanning lines */\nlet x = 1; // trailing";
    let tokens = Tokenizer::new(src).tokenize_all().unwrap();
    let words: Vec<&str> = tokens.iter().filter_map(|t| t.as_word()).collect();
    assert_eq!(words, vec!["let", "x"]);
}

#[test]
fn reports_line_and_column_of_a_lexical_error() {
    let err = Tokenizer::new("let x = 1;\nlet y = `;").tokenize_all().unwrap_err();
    match err {
        jack_tokenizer::LexError::InvalidCharacter { ch, line, .. } => {
            assert_eq!(ch, '`');
            assert_eq!(line, 2);
        }
        other => panic!("expected InvalidCharacter, got {other:?}"),
    }
}
