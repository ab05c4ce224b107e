//! Fixed OOXML tag to semantic-type table.

use phf::phf_map;

use crate::ast::SemanticType;

/// WordprocessingML tags this parser maps to semantic elements. Tags not in
/// the table are structural or unsupported and are walked through or skipped.
static TAG_TABLE: phf::Map<&'static str, SemanticType> = phf_map! {
    "w:p" => SemanticType::Paragraph,
    "w:r" => SemanticType::TextRun,
    "w:tbl" => SemanticType::Table,
    "w:tr" => SemanticType::TableRow,
    "w:tc" => SemanticType::TableCell,
    "w:hyperlink" => SemanticType::Hyperlink,
    "w:drawing" => SemanticType::Drawing,
    "w:bookmarkStart" => SemanticType::BookmarkStart,
    "w:bookmarkEnd" => SemanticType::BookmarkEnd,
    "w:commentReference" => SemanticType::CommentReference,
    "w:footnoteReference" => SemanticType::FootnoteReference,
    "w:endnoteReference" => SemanticType::EndnoteReference,
    "w:br" => SemanticType::Break,
};

/// Look up the semantic type for an OOXML tag.
#[inline]
pub fn semantic_type_for(tag: &str) -> Option<SemanticType> {
    TAG_TABLE.get(tag).copied()
}
