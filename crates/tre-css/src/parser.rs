//! Inline style parsing
//!
//! Splits a `style` attribute into declarations with cssparser and checks
//! each one against lightningcss. A malformed declaration is dropped on its
//! own and the rest of the attribute still applies. Accepted values keep the
//! text the author wrote.

use cssparser::{Delimiter, ParseError, Parser, ParserInput, Token};
use lightningcss::properties::{Property, PropertyId};
use lightningcss::stylesheet::ParserOptions;

use crate::{CssError, StyleDeclarations, StyleValue};

/// One declaration as written in the attribute
#[derive(Debug)]
struct RawDeclaration {
    name: String,
    value: String,
    important: bool,
}

/// Parse the contents of a `style` attribute
///
/// `!important` declarations are applied after the normal ones, so they
/// win within the attribute.
pub fn parse_inline_style(css: &str) -> StyleDeclarations {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut normal = StyleDeclarations::new();
    let mut important = StyleDeclarations::new();

    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }
        let start = parser.position();
        match parser.parse_until_after(Delimiter::Semicolon, parse_raw_declaration) {
            Ok(raw) => match validate_declaration(&raw) {
                Ok(value) if raw.important => important.insert(&raw.name, value),
                Ok(value) => normal.insert(&raw.name, value),
                Err(err) => tracing::warn!(%err, "Skipped invalid inline declaration"),
            },
            Err(_) => {
                let text = parser.slice_from(start).trim_end_matches(';').trim();
                if !text.is_empty() {
                    tracing::warn!(declaration = text, "Skipped malformed inline declaration");
                }
            }
        }
    }

    normal.merge(&important);
    normal
}

fn parse_raw_declaration<'i>(input: &mut Parser<'i, '_>) -> Result<RawDeclaration, ParseError<'i, ()>> {
    let name = input.expect_ident()?.to_ascii_lowercase();
    input.expect_colon()?;
    input.skip_whitespace();

    let start = input.position();
    let mut end = start;
    let mut important = false;
    loop {
        let token = match input.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::Delim('!') if input.try_parse(parse_important).is_ok() => {
                important = true;
                break;
            }
            Token::Function(_)
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock => {
                input.parse_nested_block(|block| {
                    while block.next().is_ok() {}
                    Ok::<_, ParseError<'i, ()>>(())
                })?;
            }
            _ => {}
        }
        end = input.position();
    }

    let value = input.slice(start..end).trim();
    if value.is_empty() {
        return Err(input.new_custom_error(()));
    }
    Ok(RawDeclaration {
        name,
        value: value.to_string(),
        important,
    })
}

fn parse_important<'i>(input: &mut Parser<'i, '_>) -> Result<(), ParseError<'i, ()>> {
    input.expect_ident_matching("important")?;
    input.expect_exhausted()?;
    Ok(())
}

/// Check a declaration with lightningcss, keeping the source text
fn validate_declaration(raw: &RawDeclaration) -> Result<StyleValue, CssError> {
    let id = PropertyId::from(raw.name.as_str());
    Property::parse_string(id, &raw.value, ParserOptions::default()).map_err(|err| {
        CssError::InvalidDeclaration {
            property: raw.name.clone(),
            message: format!("{:?}", err.kind),
        }
    })?;
    Ok(StyleValue::from_css(&raw.value))
}
