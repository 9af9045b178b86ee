//! Token predicates used by the parser.
//!
//! Keywords and punctuation are registry ids, so call sites compare against a [`KeywordId`] or [`PunctuationId`]
//! instead of spelling out `matches!` on the token kind.

use crate::lexer::TokenKind;
use colit_core::lang::keywords::KeywordId;
use colit_core::lang::punctuation::PunctuationId;

impl TokenKind {
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Identifier with exactly this spelling (soft keywords such as `Companion`).
    pub fn is_ident(&self, name: &str) -> bool {
        matches!(self, TokenKind::Ident(n) if n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_compare_ids_and_spellings() {
        let comma = TokenKind::Punctuation(PunctuationId::Comma);
        assert!(comma.is_punctuation(PunctuationId::Comma));
        assert!(!comma.is_punctuation(PunctuationId::Colon));
        assert!(!comma.is_keyword(KeywordId::Val));

        let ident = TokenKind::Ident("Companion".to_string());
        assert!(ident.is_ident("Companion"));
        assert!(!ident.is_ident("companion"));
    }
}
