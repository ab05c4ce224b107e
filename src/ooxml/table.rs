//! Two-pass table parsing: grid first, then rows.
//!
//! `w:tblGrid` is authoritative for column count; merge markers (`gridSpan`,
//! `vMerge`) are carried verbatim on the cells, never collapsed here.

use crate::ast::{
    BorderLine, BorderStyle, ElementNode, Node, SchemaProperties, SemanticType,
    TableCellProperties, TableRowProperties, VMergeState, WmlTableProperties,
};
use crate::common::color::ColorDefinition;
use crate::common::unit::{MeasureUnit, Measurement};
use crate::common::xml::XmlElement;

use super::parser::BodyParser;

impl BodyParser<'_> {
    pub(crate) fn parse_table(&mut self, el: &XmlElement) -> crate::common::Result<ElementNode> {
        let mut props = WmlTableProperties::default();

        if let Some(tbl_pr) = el.child("w:tblPr") {
            props.style_id = tbl_pr
                .child("w:tblStyle")
                .and_then(|e| e.attr("w:val"))
                .map(str::to_string);
            props.width = tbl_pr.child("w:tblW").and_then(parse_width);
            props.borders = tbl_pr
                .child("w:tblBorders")
                .and_then(|b| b.child("w:top"))
                .and_then(parse_border);
        }

        // Pass one: the grid fixes the column count.
        if let Some(grid) = el.child("w:tblGrid") {
            for col in grid.children_named("w:gridCol") {
                let width = col
                    .attr("w:w")
                    .and_then(|v| v.parse::<f64>().ok())
                    .map(Measurement::dxa)
                    .unwrap_or_else(Measurement::auto);
                props.grid_columns.push(width);
            }
        }

        let mut table = ElementNode::new(
            el.name.clone(),
            SemanticType::Table,
            SchemaProperties::Table(props),
        )?;

        // Pass two: rows and cells.
        for tr in el.children_named("w:tr") {
            let row = self.parse_row(tr)?;
            table.push_child(Node::Element(row))?;
        }
        Ok(table)
    }

    fn parse_row(&mut self, el: &XmlElement) -> crate::common::Result<ElementNode> {
        let mut props = TableRowProperties::default();
        if let Some(tr_pr) = el.child("w:trPr") {
            props.height = tr_pr
                .child("w:trHeight")
                .and_then(|e| e.attr("w:val"))
                .and_then(|v| v.parse::<f64>().ok())
                .map(Measurement::dxa);
            props.header = tr_pr.child("w:tblHeader").is_some();
        }

        let mut row = ElementNode::new(
            el.name.clone(),
            SemanticType::TableRow,
            SchemaProperties::TableRow(props),
        )?;
        for tc in el.children_named("w:tc") {
            let cell = self.parse_cell(tc)?;
            row.push_child(Node::Element(cell))?;
        }
        Ok(row)
    }

    fn parse_cell(&mut self, el: &XmlElement) -> crate::common::Result<ElementNode> {
        let mut props = TableCellProperties::default();
        if let Some(tc_pr) = el.child("w:tcPr") {
            props.grid_span = tc_pr
                .child("w:gridSpan")
                .and_then(|e| e.attr("w:val"))
                .and_then(|v| atoi_simd::parse::<u32>(v.as_bytes()).ok());
            // A vMerge with no w:val continues the merge above it.
            props.v_merge = tc_pr.child("w:vMerge").map(|m| match m.attr("w:val") {
                Some("restart") => VMergeState::Restart,
                _ => VMergeState::Continue,
            });
            props.width = tc_pr.child("w:tcW").and_then(parse_width);
            props.vertical_align = tc_pr
                .child("w:vAlign")
                .and_then(|e| e.attr("w:val"))
                .and_then(crate::ast::CellVerticalAlign::parse);
        }

        let mut cell = ElementNode::new(
            el.name.clone(),
            SemanticType::TableCell,
            SchemaProperties::TableCell(props),
        )?;
        // Cell content is a nested body: paragraphs and tables, recursively.
        for block in self.parse_body(el) {
            cell.push_child(block)?;
        }
        Ok(cell)
    }
}

/// Parse a `w:tblW`/`w:tcW` width element: `w:type` selects the unit.
fn parse_width(el: &XmlElement) -> Option<Measurement> {
    match el.attr("w:type") {
        Some("auto") => Some(Measurement::auto()),
        Some("nil") => Some(Measurement::dxa(0.0)),
        Some("pct") => el
            .attr("w:w")
            .and_then(|v| v.parse::<f64>().ok())
            .map(|v| Measurement::new(v, MeasureUnit::Pct)),
        _ => el
            .attr("w:w")
            .and_then(|v| v.parse::<f64>().ok())
            .map(Measurement::dxa),
    }
}

fn parse_border(el: &XmlElement) -> Option<BorderLine> {
    let style = match el.attr("w:val")? {
        "none" | "nil" => BorderStyle::None,
        "thick" => BorderStyle::Thick,
        "double" => BorderStyle::Double,
        "dotted" => BorderStyle::Dotted,
        "dashed" | "dashSmallGap" => BorderStyle::Dashed,
        _ => BorderStyle::Single,
    };
    Some(BorderLine {
        style,
        size: el
            .attr("w:sz")
            .and_then(|v| atoi_simd::parse::<u32>(v.as_bytes()).ok()),
        color: el.attr("w:color").and_then(ColorDefinition::parse_attr),
    })
}
