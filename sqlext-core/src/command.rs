//! Commands: the typed output of statement dispatch.
//!
//! Commands are plain data. Executing them is the caller's business.

use crate::ast::{Expression, IntervalLiteral, MergeMatch, QualifiedName, Query, Statement};
use crate::span::Span;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Command {
    Merge(MergeCommand),
    Load(LoadCommand),
    Export(ExportCommand),
    /// A statement with no dedicated command, handed on untouched.
    Passthrough(Statement),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Merge(_) => "MERGE",
            Command::Load(_) => "LOAD",
            Command::Export(_) => "EXPORT",
            Command::Passthrough(_) => "PASSTHROUGH",
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

// ==================== Identifiers ====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifierPart {
    pub name: String,
    pub quoted: bool,
}

/// Possibly qualified table name, e.g. `db.events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableIdentifier {
    pub parts: Vec<IdentifierPart>,
    pub span: Span,
}

impl TableIdentifier {
    /// The last name part
    pub fn table(&self) -> &str {
        self.parts.last().map(|p| p.name.as_str()).unwrap_or("")
    }

    /// The part before the table name, if any
    pub fn database(&self) -> Option<&str> {
        let n = self.parts.len();
        if n >= 2 {
            Some(self.parts[n - 2].name.as_str())
        } else {
            None
        }
    }

    /// Parts joined by `.`; parts that were back-quoted are quoted again.
    pub fn qualified_name(&self) -> String {
        self.parts
            .iter()
            .map(|part| {
                if part.quoted {
                    format!("`{}`", part.name.replace('`', "``"))
                } else {
                    part.name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl From<&QualifiedName> for TableIdentifier {
    fn from(name: &QualifiedName) -> Self {
        Self {
            parts: name
                .parts
                .iter()
                .map(|ident| IdentifierPart {
                    name: ident.value.clone(),
                    quoted: ident.quoted,
                })
                .collect(),
            span: name.span,
        }
    }
}

impl fmt::Display for TableIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

// ==================== Literal values ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    String(String),
    Int(i32),
    Long(i64),
    Short(i16),
    Byte(i8),
    Double(f64),
    /// Kept as text so no precision is lost
    Decimal(String),
    /// Size in bytes, e.g. `64M` is 67108864
    ByteLength(u64),
    Interval(IntervalLiteral),
    Typed { type_name: String, value: String },
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Null => write!(f, "NULL"),
            LiteralValue::Boolean(b) => write!(f, "{}", b),
            LiteralValue::String(s) => write!(f, "{}", s),
            LiteralValue::Int(n) => write!(f, "{}", n),
            LiteralValue::Long(n) => write!(f, "{}", n),
            LiteralValue::Short(n) => write!(f, "{}", n),
            LiteralValue::Byte(n) => write!(f, "{}", n),
            LiteralValue::Double(n) => write!(f, "{}", n),
            LiteralValue::Decimal(s) => write!(f, "{}", s),
            LiteralValue::ByteLength(n) => write!(f, "{}", n),
            LiteralValue::Interval(interval) => {
                write!(f, "INTERVAL")?;
                for field in &interval.fields {
                    write!(f, " {} {}", field.value, field.unit)?;
                    if let Some(to) = &field.to_unit {
                        write!(f, " TO {}", to)?;
                    }
                }
                Ok(())
            }
            LiteralValue::Typed { type_name, value } => write!(f, "{} '{}'", type_name, value),
        }
    }
}

// ==================== Partitions & options ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionEntry {
    pub column: String,
    /// `None` for a dynamic partition column
    pub value: Option<LiteralValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionSpec {
    pub entries: Vec<PartitionEntry>,
}

impl PartitionSpec {
    /// Whether any column is left for the data to decide
    pub fn is_dynamic(&self) -> bool {
        self.entries.iter().any(|e| e.value.is_none())
    }

    pub fn get(&self, column: &str) -> Option<&PartitionEntry> {
        self.entries
            .iter()
            .find(|e| e.column.eq_ignore_ascii_case(column))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionEntry {
    pub key: String,
    pub value: LiteralValue,
}

fn find_option<'a>(options: &'a [OptionEntry], key: &str) -> Option<&'a LiteralValue> {
    options.iter().find(|o| o.key == key).map(|o| &o.value)
}

// ==================== MERGE ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MergeSource {
    Table(TableIdentifier),
    Query(Box<Query>),
}

/// `SET column = value` inside a merge update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnAssignment {
    /// Name parts of the assigned column, e.g. `["t", "amount"]`
    pub column: Vec<String>,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MergeAction {
    UpdateAll,
    Update(Vec<ColumnAssignment>),
    Delete,
    InsertAll,
    Insert {
        columns: Vec<String>,
        values: Vec<Expression>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeClause {
    pub kind: MergeMatch,
    pub condition: Option<Expression>,
    pub action: MergeAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeCommand {
    pub target: TableIdentifier,
    pub target_alias: Option<String>,
    pub source: MergeSource,
    pub source_alias: Option<String>,
    pub condition: Expression,
    pub clauses: Vec<MergeClause>,
}

// ==================== LOAD ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadCommand {
    pub path: String,
    /// LOCAL: the path is on the client machine
    pub local: bool,
    pub overwrite: bool,
    pub table: TableIdentifier,
    pub partition: Option<PartitionSpec>,
    pub options: Vec<OptionEntry>,
}

impl LoadCommand {
    pub fn option(&self, key: &str) -> Option<&LiteralValue> {
        find_option(&self.options, key)
    }
}

// ==================== EXPORT ====================

pub const DEFAULT_EXPORT_FORMAT: &str = "csv";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportCommand {
    pub query: Query,
    pub path: String,
    /// Lower-cased format name
    pub format: String,
    pub options: Vec<OptionEntry>,
}

impl ExportCommand {
    pub fn option(&self, key: &str) -> Option<&LiteralValue> {
        find_option(&self.options, key)
    }
}
