//! Minimal CSV writer for the export tables.

use std::borrow::Cow;

/// One CSV value. Only text is ever quoted.
#[derive(Debug, Clone, Copy)]
pub enum Field<'a> {
    Text(&'a str),
    Int(i64),
    Bool(bool),
}

impl<'a> From<&'a str> for Field<'a> {
    fn from(s: &'a str) -> Self {
        Field::Text(s)
    }
}

impl From<i32> for Field<'_> {
    fn from(n: i32) -> Self {
        Field::Int(i64::from(n))
    }
}

impl From<u32> for Field<'_> {
    fn from(n: u32) -> Self {
        Field::Int(i64::from(n))
    }
}

impl From<bool> for Field<'_> {
    fn from(b: bool) -> Self {
        Field::Bool(b)
    }
}

/// Quote a text value if it contains a delimiter, quote or line break.
pub fn escape(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Accumulates rows into a `\n`-terminated CSV string.
#[derive(Debug)]
pub struct CsvWriter {
    out: String,
}

impl CsvWriter {
    pub fn new(header: &[&str]) -> Self {
        let mut writer = Self { out: String::new() };
        let fields: Vec<Field<'_>> = header.iter().map(|h| Field::Text(h)).collect();
        writer.row(&fields);
        writer
    }

    pub fn row(&mut self, fields: &[Field<'_>]) {
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            match field {
                Field::Text(s) => self.out.push_str(&escape(s)),
                Field::Int(n) => self.out.push_str(&n.to_string()),
                Field::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            }
        }
        self.out.push('\n');
    }

    pub fn finish(self) -> String {
        self.out
    }
}
