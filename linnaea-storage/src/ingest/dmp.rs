//! Line framing for the NCBI taxdump file family
//!
//! Fields are separated by `\t|\t` and each record ends with `\t|` (plus
//! the newline the reader already strips). Boolean columns are carried as
//! integer strings, nonzero meaning true.

use linnaea_core::error::{LinnaeaError, LinnaeaResult};
use linnaea_core::types::{Division, GenCode, TaxId, TaxonName, TaxonomyNode};

pub const FIELD_SEP: &str = "\t|\t";
pub const LINE_END: &str = "\t|";

/// Split one dump line into its raw fields
pub fn split_line(line: &str) -> Vec<&str> {
    let body = line.strip_suffix(LINE_END).unwrap_or(line);
    body.split(FIELD_SEP).collect()
}

/// Join fields back into a dump line (without the trailing newline)
pub fn join_line(fields: &[String]) -> String {
    format!("{}{}", fields.join(FIELD_SEP), LINE_END)
}

fn parse_taxid_field(field: &str, what: &str) -> LinnaeaResult<TaxId> {
    field
        .parse::<u32>()
        .map(TaxId)
        .map_err(|_| LinnaeaError::Parse(format!("invalid {}: {:?}", what, field)))
}

fn parse_u32_field(field: &str, what: &str) -> LinnaeaResult<u32> {
    field
        .parse::<u32>()
        .map_err(|_| LinnaeaError::Parse(format!("invalid {}: {:?}", what, field)))
}

/// Integer-string flag column: "0" is false, any other integer is true
pub fn parse_flag(field: &str) -> LinnaeaResult<bool> {
    field
        .parse::<i64>()
        .map(|v| v != 0)
        .map_err(|_| LinnaeaError::Parse(format!("invalid flag field: {:?}", field)))
}

pub fn format_flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// A row type with a taxdump text representation
pub trait DmpRecord: Sized {
    /// Number of fields in one record of this table
    const FIELD_COUNT: usize;

    fn from_fields(fields: &[&str]) -> LinnaeaResult<Self>;

    fn to_fields(&self) -> Vec<String>;

    fn parse_line(line: &str) -> LinnaeaResult<Self> {
        let fields = split_line(line);
        if fields.len() != Self::FIELD_COUNT {
            return Err(LinnaeaError::Parse(format!(
                "expected {} fields, found {}: {:?}",
                Self::FIELD_COUNT,
                fields.len(),
                line
            )));
        }
        Self::from_fields(&fields)
    }

    fn format_line(&self) -> String {
        join_line(&self.to_fields())
    }
}

impl DmpRecord for TaxonomyNode {
    const FIELD_COUNT: usize = 13;

    fn from_fields(fields: &[&str]) -> LinnaeaResult<Self> {
        Ok(Self {
            taxid: parse_taxid_field(fields[0], "taxid")?,
            parent_taxid: parse_taxid_field(fields[1], "parent taxid")?,
            rank: fields[2].to_string(),
            embl_code: fields[3].to_string(),
            division_id: parse_u32_field(fields[4], "division id")?,
            inherited_div_flag: parse_flag(fields[5])?,
            genetic_code_id: fields[6].to_string(),
            inherited_gc_flag: parse_flag(fields[7])?,
            mito_genetic_code_id: fields[8].to_string(),
            inherited_mgc_flag: parse_flag(fields[9])?,
            genbank_hidden_flag: parse_flag(fields[10])?,
            hidden_subtree_root_flag: parse_flag(fields[11])?,
            comments: fields[12].to_string(),
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.taxid.to_string(),
            self.parent_taxid.to_string(),
            self.rank.clone(),
            self.embl_code.clone(),
            self.division_id.to_string(),
            format_flag(self.inherited_div_flag).to_string(),
            self.genetic_code_id.clone(),
            format_flag(self.inherited_gc_flag).to_string(),
            self.mito_genetic_code_id.clone(),
            format_flag(self.inherited_mgc_flag).to_string(),
            format_flag(self.genbank_hidden_flag).to_string(),
            format_flag(self.hidden_subtree_root_flag).to_string(),
            self.comments.clone(),
        ]
    }
}

impl DmpRecord for TaxonName {
    const FIELD_COUNT: usize = 4;

    fn from_fields(fields: &[&str]) -> LinnaeaResult<Self> {
        Ok(Self {
            taxid: parse_taxid_field(fields[0], "taxid")?,
            name: fields[1].to_string(),
            unique_name: fields[2].to_string(),
            name_class: fields[3].to_string(),
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.taxid.to_string(),
            self.name.clone(),
            self.unique_name.clone(),
            self.name_class.clone(),
        ]
    }
}

impl DmpRecord for Division {
    const FIELD_COUNT: usize = 4;

    fn from_fields(fields: &[&str]) -> LinnaeaResult<Self> {
        Ok(Self {
            division_id: parse_u32_field(fields[0], "division id")?,
            code: fields[1].to_string(),
            name: fields[2].to_string(),
            comments: fields[3].to_string(),
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.division_id.to_string(),
            self.code.clone(),
            self.name.clone(),
            self.comments.clone(),
        ]
    }
}

impl DmpRecord for GenCode {
    const FIELD_COUNT: usize = 5;

    fn from_fields(fields: &[&str]) -> LinnaeaResult<Self> {
        Ok(Self {
            code_id: fields[0].to_string(),
            abbreviation: fields[1].to_string(),
            name: fields[2].to_string(),
            translation_table: fields[3].to_string(),
            start_codons: fields[4].to_string(),
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.code_id.clone(),
            self.abbreviation.clone(),
            self.name.clone(),
            self.translation_table.clone(),
            self.start_codons.clone(),
        ]
    }
}
