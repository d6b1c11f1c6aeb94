//! Selector parser
//!
//! Strict: anything malformed or unsupported is an error, the way
//! `querySelectorAll` throws on a bad selector.

use crate::SelectorError;
use crate::selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, Compound, NthExpression,
    PseudoClass, SelectorComponent, SelectorList,
};

/// Parse a comma-separated selector list
pub fn parse_selector_list(input: &str) -> Result<SelectorList, SelectorError> {
    let parts = split_top_level(input, |c| c == ',')?;
    if parts.iter().all(|p| p.trim().is_empty()) {
        return Err(SelectorError::Empty);
    }

    let mut list = Vec::with_capacity(parts.len());
    for part in parts {
        let part = part.trim();
        if part.is_empty() {
            return Err(unexpected(input, ","));
        }
        list.push(parse_complex(part)?);
    }
    Ok(SelectorList(list))
}

fn unexpected(selector: &str, found: &str) -> SelectorError {
    SelectorError::Unexpected {
        selector: selector.to_string(),
        found: found.to_string(),
    }
}

/// Bracket/quote tracking shared by every scanning pass
#[derive(Default)]
struct Nesting {
    depth: usize,
    quote: Option<char>,
}

impl Nesting {
    /// Feed one char; returns true if it sits at top level (outside any
    /// brackets, parentheses or quotes) before being consumed
    fn feed(&mut self, c: char, input: &str) -> Result<bool, SelectorError> {
        if let Some(q) = self.quote {
            if c == q {
                self.quote = None;
            }
            return Ok(false);
        }
        let top = self.depth == 0;
        match c {
            '"' | '\'' => self.quote = Some(c),
            '[' | '(' => self.depth += 1,
            ']' | ')' => {
                self.depth = self
                    .depth
                    .checked_sub(1)
                    .ok_or_else(|| SelectorError::Unbalanced(input.to_string()))?;
                return Ok(false);
            }
            _ => {}
        }
        Ok(top)
    }

    fn finish(&self, input: &str) -> Result<(), SelectorError> {
        if self.depth != 0 || self.quote.is_some() {
            return Err(SelectorError::Unbalanced(input.to_string()));
        }
        Ok(())
    }
}

fn split_top_level(input: &str, is_sep: impl Fn(char) -> bool) -> Result<Vec<&str>, SelectorError> {
    let mut nesting = Nesting::default();
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in input.char_indices() {
        if nesting.feed(c, input)? && is_sep(c) {
            parts.push(&input[start..i]);
            start = i + c.len_utf8();
        }
    }
    nesting.finish(input)?;
    parts.push(&input[start..]);
    Ok(parts)
}

enum Token<'a> {
    Compound(&'a str),
    Whitespace,
    Combinator(Combinator),
}

fn tokenize(input: &str) -> Result<Vec<Token<'_>>, SelectorError> {
    let mut nesting = Nesting::default();
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in input.char_indices() {
        let top = nesting.feed(c, input)?;
        let combinator = match c {
            '>' => Some(Combinator::Child),
            '+' => Some(Combinator::NextSibling),
            '~' => Some(Combinator::SubsequentSibling),
            _ => None,
        };
        if top && (c.is_whitespace() || combinator.is_some()) {
            if let Some(s) = start.take() {
                tokens.push(Token::Compound(&input[s..i]));
            }
            tokens.push(match combinator {
                Some(comb) => Token::Combinator(comb),
                None => Token::Whitespace,
            });
        } else if start.is_none() {
            start = Some(i);
        }
    }
    nesting.finish(input)?;
    if let Some(s) = start {
        tokens.push(Token::Compound(&input[s..]));
    }
    Ok(tokens)
}

fn parse_complex(input: &str) -> Result<ComplexSelector, SelectorError> {
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let mut pending: Option<Combinator> = None;

    for token in tokenize(input)? {
        match token {
            Token::Whitespace => {
                if !compounds.is_empty() && pending.is_none() {
                    pending = Some(Combinator::Descendant);
                }
            }
            Token::Combinator(comb) => {
                if compounds.is_empty() {
                    return Err(unexpected(input, &combinator_str(comb)));
                }
                if matches!(pending, Some(p) if p != Combinator::Descendant) {
                    return Err(unexpected(input, &combinator_str(comb)));
                }
                pending = Some(comb);
            }
            Token::Compound(text) => {
                if !compounds.is_empty() {
                    let comb = pending.take().ok_or_else(|| unexpected(input, text))?;
                    combinators.push(comb);
                }
                compounds.push(parse_compound(text)?);
            }
        }
    }

    match pending {
        Some(comb) if comb != Combinator::Descendant => {
            Err(unexpected(input, &combinator_str(comb)))
        }
        _ if compounds.is_empty() => Err(SelectorError::Empty),
        _ => Ok(ComplexSelector { compounds, combinators }),
    }
}

fn combinator_str(comb: Combinator) -> String {
    match comb {
        Combinator::Descendant => " ",
        Combinator::Child => ">",
        Combinator::NextSibling => "+",
        Combinator::SubsequentSibling => "~",
    }
    .to_string()
}

/// Split `li.item[data-x]:first-child` into its simple selectors
fn parse_compound(input: &str) -> Result<Compound, SelectorError> {
    let mut nesting = Nesting::default();
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut prev = '\0';

    for (i, c) in input.char_indices() {
        let top = nesting.feed(c, input)?;
        let boundary = matches!(c, '#' | '.' | '[' | ':') && !(c == ':' && prev == ':');
        if top && boundary && i > start {
            pieces.push(&input[start..i]);
            start = i;
        }
        prev = c;
    }
    nesting.finish(input)?;
    pieces.push(&input[start..]);

    let mut components = Vec::with_capacity(pieces.len());
    for (idx, piece) in pieces.into_iter().enumerate() {
        let component = parse_simple_selector(piece)?;
        // Type and universal selectors may only lead a compound
        if idx > 0 && matches!(component, SelectorComponent::Type(_) | SelectorComponent::Universal) {
            return Err(unexpected(input, piece));
        }
        components.push(component);
    }
    Ok(Compound(components))
}

/// Parse a simple selector (type, class, id, attribute or pseudo-class)
pub(crate) fn parse_simple_selector(input: &str) -> Result<SelectorComponent, SelectorError> {
    if input.is_empty() {
        return Err(SelectorError::Empty);
    }

    if input == "*" {
        return Ok(SelectorComponent::Universal);
    }

    if let Some(id) = input.strip_prefix('#') {
        return ident(id).map(|id| SelectorComponent::Id(id.to_string()));
    }

    if let Some(class) = input.strip_prefix('.') {
        return ident(class).map(|class| SelectorComponent::Class(class.to_string()));
    }

    if let Some(content) = input.strip_prefix('[') {
        let content = content
            .strip_suffix(']')
            .ok_or_else(|| SelectorError::Unbalanced(input.to_string()))?;
        return parse_attribute_selector(content);
    }

    if let Some(pseudo) = input.strip_prefix(':') {
        if pseudo.starts_with(':') {
            // Pseudo-elements never match real nodes
            return Err(SelectorError::UnsupportedPseudo(input.to_string()));
        }
        return parse_pseudo_class(pseudo).map(SelectorComponent::PseudoClass);
    }

    ident(input).map(|tag| SelectorComponent::Type(tag.to_ascii_lowercase()))
}

/// Check if string is a valid CSS identifier
fn is_valid_ident(s: &str) -> bool {
    let mut chars = s.chars();

    let first_ok = match chars.next() {
        Some('-') => s.len() > 1 && !s[1..].starts_with(|c: char| c.is_ascii_digit()),
        Some(c) => c.is_ascii_alphabetic() || c == '_' || !c.is_ascii(),
        None => false,
    };

    first_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii())
}

fn ident(s: &str) -> Result<&str, SelectorError> {
    if is_valid_ident(s) {
        Ok(s)
    } else {
        Err(SelectorError::InvalidIdent(s.to_string()))
    }
}

/// Parse an attribute selector content (without brackets)
fn parse_attribute_selector(content: &str) -> Result<SelectorComponent, SelectorError> {
    let content = content.trim();

    let (content, case_insensitive) = match content
        .strip_suffix(" i")
        .or_else(|| content.strip_suffix(" I"))
    {
        Some(rest) => (rest.trim_end(), true),
        None => (content, false),
    };

    // The first '=' always belongs to the operator; the value may contain more
    let Some(eq) = content.find('=') else {
        return Ok(SelectorComponent::Attribute(AttributeSelector {
            name: ident(content)?.to_ascii_lowercase(),
            matcher: None,
            case_insensitive,
        }));
    };

    let head = &content[..eq];
    let (name, matcher_fn): (&str, fn(String) -> AttributeMatcher) = match head.chars().last() {
        Some('~') => (&head[..head.len() - 1], AttributeMatcher::Contains),
        Some('|') => (&head[..head.len() - 1], AttributeMatcher::DashMatch),
        Some('^') => (&head[..head.len() - 1], AttributeMatcher::Prefix),
        Some('$') => (&head[..head.len() - 1], AttributeMatcher::Suffix),
        Some('*') => (&head[..head.len() - 1], AttributeMatcher::Substring),
        _ => (head, AttributeMatcher::Exact),
    };
    let name = ident(name.trim())?.to_ascii_lowercase();
    let raw = content[eq + 1..].trim();
    let value = unquote(raw).ok_or_else(|| SelectorError::Unbalanced(raw.to_string()))?;

    Ok(SelectorComponent::Attribute(AttributeSelector {
        name,
        matcher: Some(matcher_fn(value.to_string())),
        case_insensitive,
    }))
}

/// Strip matching quotes, or accept a bare identifier
fn unquote(raw: &str) -> Option<&str> {
    for q in ['"', '\''] {
        if let Some(inner) = raw.strip_prefix(q) {
            return inner.strip_suffix(q);
        }
    }
    is_valid_ident(raw).then_some(raw)
}

/// Parse a pseudo-class (without the leading colon)
fn parse_pseudo_class(input: &str) -> Result<PseudoClass, SelectorError> {
    let unsupported = || SelectorError::UnsupportedPseudo(format!(":{}", input));

    if let Some(paren_pos) = input.find('(') {
        let name = input[..paren_pos].to_ascii_lowercase();
        let arg = input[paren_pos + 1..]
            .strip_suffix(')')
            .ok_or_else(|| SelectorError::Unbalanced(input.to_string()))?;
        let nth = |arg: &str| NthExpression::parse(arg).ok_or_else(unsupported);

        return match name.as_str() {
            "nth-child" => nth(arg).map(PseudoClass::NthChild),
            "nth-last-child" => nth(arg).map(PseudoClass::NthLastChild),
            "nth-of-type" => nth(arg).map(PseudoClass::NthOfType),
            "nth-last-of-type" => nth(arg).map(PseudoClass::NthLastOfType),
            "not" => parse_selector_list(arg).map(PseudoClass::Not),
            "is" => parse_selector_list(arg).map(PseudoClass::Is),
            "where" => parse_selector_list(arg).map(PseudoClass::Where),
            "lang" => ident(arg.trim()).map(|l| PseudoClass::Lang(l.to_ascii_lowercase())),
            _ => Err(unsupported()),
        };
    }

    match input.to_ascii_lowercase().as_str() {
        "root" => Ok(PseudoClass::Root),
        "empty" => Ok(PseudoClass::Empty),
        "first-child" => Ok(PseudoClass::FirstChild),
        "last-child" => Ok(PseudoClass::LastChild),
        "only-child" => Ok(PseudoClass::OnlyChild),
        "first-of-type" => Ok(PseudoClass::FirstOfType),
        "last-of-type" => Ok(PseudoClass::LastOfType),
        "only-of-type" => Ok(PseudoClass::OnlyOfType),
        "link" | "any-link" => Ok(PseudoClass::Link),
        "checked" => Ok(PseudoClass::Checked),
        "disabled" => Ok(PseudoClass::Disabled),
        "enabled" => Ok(PseudoClass::Enabled),
        _ => Err(unsupported()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(input: &str) -> ComplexSelector {
        let mut list = parse_selector_list(input).unwrap();
        assert_eq!(list.len(), 1);
        list.0.remove(0)
    }

    #[test]
    fn test_compound_pieces() {
        let sel = single("li.item#first[data-x]:first-child");
        assert_eq!(sel.compounds.len(), 1);
        let parts = &sel.compounds[0].0;
        assert_eq!(parts[0], SelectorComponent::Type("li".into()));
        assert_eq!(parts[1], SelectorComponent::Class("item".into()));
        assert_eq!(parts[2], SelectorComponent::Id("first".into()));
        assert!(matches!(parts[3], SelectorComponent::Attribute(_)));
        assert_eq!(parts[4], SelectorComponent::PseudoClass(PseudoClass::FirstChild));
    }

    #[test]
    fn test_combinators() {
        let sel = single("ul > li + li ~ li  span");
        assert_eq!(sel.compounds.len(), 5);
        assert_eq!(
            sel.combinators,
            vec![
                Combinator::Child,
                Combinator::NextSibling,
                Combinator::SubsequentSibling,
                Combinator::Descendant,
            ]
        );
    }

    #[test]
    fn test_combinator_without_spaces() {
        let sel = single("ul>li");
        assert_eq!(sel.combinators, vec![Combinator::Child]);
    }

    #[test]
    fn test_selector_list() {
        let list = parse_selector_list("h1, h2 ,h3").unwrap();
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_attribute_value_with_spaces_and_brackets() {
        let sel = single(r#"a[title="a > b, c"]"#);
        let SelectorComponent::Attribute(attr) = &sel.compounds[0].0[1] else {
            panic!("expected attribute selector");
        };
        assert_eq!(attr.matcher, Some(AttributeMatcher::Exact("a > b, c".into())));
    }

    #[test]
    fn test_attribute_case_flag() {
        let sel = single("[type=TEXT i]");
        let SelectorComponent::Attribute(attr) = &sel.compounds[0].0[0] else {
            panic!("expected attribute selector");
        };
        assert!(attr.case_insensitive);
        assert_eq!(attr.matcher, Some(AttributeMatcher::Exact("TEXT".into())));
    }

    #[test]
    fn test_nested_not() {
        let sel = single("li:not(.done, .hidden)");
        let SelectorComponent::PseudoClass(PseudoClass::Not(inner)) = &sel.compounds[0].0[1] else {
            panic!("expected :not");
        };
        assert_eq!(inner.len(), 2);
    }

    #[test]
    fn test_nth_child_with_plus_is_not_a_combinator() {
        let sel = single("li:nth-child(2n+1)");
        assert_eq!(sel.compounds.len(), 1);
    }

    #[test]
    fn test_invalid_selectors() {
        for bad in ["", "  ", "div >", "> div", "a,,b", "div[", "li:hover", "p::before", ".1abc", "a > > b", "div span*"] {
            assert!(parse_selector_list(bad).is_err(), "{:?} should not parse", bad);
        }
    }
}
