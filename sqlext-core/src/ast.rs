//! Parse tree produced by the parser.
//!
//! Every node owns its children and records the span from its first to its last token.

use crate::lexer::Token;
use crate::span::Span;
use serde::Serialize;

/// Top-level result of a parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParseNode {
    Statement(Statement),
    /// A bare expression. Useful for tooling, but it has no command mapping.
    Expression(Expression),
}

impl ParseNode {
    pub fn span(&self) -> Span {
        match self {
            ParseNode::Statement(stmt) => stmt.span(),
            ParseNode::Expression(expr) => expr.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    Merge(MergeStatement),
    Load(LoadStatement),
    Export(ExportStatement),
    Query(Query),
    /// Any other statement, kept as its raw token sequence.
    Opaque(OpaqueStatement),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Merge(s) => s.span,
            Statement::Load(s) => s.span,
            Statement::Export(s) => s.span,
            Statement::Query(q) => q.span,
            Statement::Opaque(s) => s.span,
        }
    }

    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Statement::Merge(_) => "merge",
            Statement::Load(_) => "load",
            Statement::Export(_) => "export",
            Statement::Query(_) => "query",
            Statement::Opaque(_) => "opaque",
        }
    }
}

// ==================== Names ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ident {
    pub value: String,
    /// Written with back-quotes
    pub quoted: bool,
    pub span: Span,
}

/// `a`, `db.tbl`, `t.col`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualifiedName {
    pub parts: Vec<Ident>,
    pub span: Span,
}

impl QualifiedName {
    pub fn last(&self) -> Option<&Ident> {
        self.parts.last()
    }
}

// ==================== Extended statements ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeStatement {
    pub target: QualifiedName,
    pub target_alias: Option<Ident>,
    pub source: MergeSourceNode,
    pub source_alias: Option<Ident>,
    pub condition: Expression,
    pub clauses: Vec<MergeClauseNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MergeSourceNode {
    Table(QualifiedName),
    Query(Box<Query>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MergeMatch {
    /// WHEN MATCHED
    Matched,
    /// WHEN NOT MATCHED [BY TARGET]
    NotMatched,
    /// WHEN NOT MATCHED BY SOURCE
    NotMatchedBySource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeClauseNode {
    pub kind: MergeMatch,
    pub condition: Option<Expression>,
    pub action: MergeActionNode,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MergeActionNode {
    UpdateAll,
    Update(Vec<Assignment>),
    Delete,
    InsertAll,
    Insert {
        columns: Vec<Ident>,
        values: Vec<Expression>,
    },
}

/// `target.col = expression`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub target: QualifiedName,
    pub value: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadStatement {
    pub path: Constant,
    pub local: bool,
    pub overwrite: bool,
    pub table: QualifiedName,
    pub partition: Option<PartitionSpecNode>,
    pub options: Option<OptionListNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportStatement {
    pub query: Box<Query>,
    pub path: Constant,
    pub format: Option<Ident>,
    pub options: Option<OptionListNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionSpecNode {
    pub entries: Vec<PartitionVal>,
    pub span: Span,
}

/// `col` or `col = constant`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionVal {
    pub column: Ident,
    pub value: Option<Constant>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionListNode {
    pub entries: Vec<OptionVal>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionVal {
    /// Dotted identifier key joined with `.`, or the decoded string key
    pub key: String,
    pub key_span: Span,
    pub value: Constant,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpaqueStatement {
    /// Upper-cased first word, e.g. `CREATE`
    pub leading: String,
    pub tokens: Vec<Token>,
    pub span: Span,
}

// ==================== Constants ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constant {
    pub value: Literal,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NumberKind {
    Integer,
    BigInt,
    SmallInt,
    TinyInt,
    ByteLength,
    Decimal,
    Double,
    BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Null,
    Boolean(bool),
    /// Adjacent string tokens, decoded and concatenated
    String(String),
    /// Numeric token text, sign included, suffix included
    Number { kind: NumberKind, text: String },
    /// `DATE '2020-01-01'`, `X'1F'`
    Typed { type_name: String, value: String },
    Interval(IntervalLiteral),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalLiteral {
    pub fields: Vec<IntervalField>,
}

/// `3 DAYS`, `'1-2' YEAR TO MONTH`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalField {
    pub value: String,
    pub unit: String,
    pub to_unit: Option<String>,
}

// ==================== Queries ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    pub with: Vec<NamedQuery>,
    pub body: QueryBody,
    pub order_by: Vec<SortItem>,
    pub limit: Option<Expression>,
    pub span: Span,
}

/// One `name [(cols)] AS (query)` entry of a WITH clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedQuery {
    pub name: Ident,
    pub columns: Vec<Ident>,
    pub query: Box<Query>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SetOperator {
    Union,
    Except,
    Intersect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SetQuantifier {
    Distinct,
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum QueryBody {
    Select(Box<Select>),
    SetOperation {
        op: SetOperator,
        quantifier: Option<SetQuantifier>,
        left: Box<QueryBody>,
        right: Box<QueryBody>,
        span: Span,
    },
    /// `TABLE t`
    Table { name: QualifiedName, span: Span },
    Values { rows: Vec<Expression>, span: Span },
    Nested(Box<Query>),
}

impl QueryBody {
    pub fn span(&self) -> Span {
        match self {
            QueryBody::Select(s) => s.span,
            QueryBody::SetOperation { span, .. }
            | QueryBody::Table { span, .. }
            | QueryBody::Values { span, .. } => *span,
            QueryBody::Nested(q) => q.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Select {
    pub quantifier: Option<SetQuantifier>,
    pub projection: Vec<NamedExpression>,
    pub from: Vec<Relation>,
    pub selection: Option<Expression>,
    pub group_by: Option<GroupBy>,
    pub having: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedExpression {
    pub expr: Expression,
    pub alias: Option<Ident>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Grouping {
    Plain,
    Rollup,
    Cube,
    Sets(Vec<Vec<Expression>>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupBy {
    pub expressions: Vec<Expression>,
    pub grouping: Grouping,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortItem {
    pub expr: Expression,
    pub ascending: Option<bool>,
    pub nulls_first: Option<bool>,
    pub span: Span,
}

/// A relation in FROM followed by its joins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relation {
    pub primary: RelationPrimary,
    pub joins: Vec<Join>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RelationPrimary {
    Table {
        name: QualifiedName,
        alias: Option<Ident>,
        span: Span,
    },
    Subquery {
        query: Box<Query>,
        alias: Option<Ident>,
        span: Span,
    },
    Nested(Box<Relation>),
}

impl RelationPrimary {
    pub fn span(&self) -> Span {
        match self {
            RelationPrimary::Table { span, .. } | RelationPrimary::Subquery { span, .. } => *span,
            RelationPrimary::Nested(r) => r.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum JoinType {
    Inner,
    Cross,
    LeftOuter,
    LeftSemi,
    LeftAnti,
    RightOuter,
    FullOuter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum JoinCriteria {
    On(Expression),
    Using(Vec<Ident>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Join {
    pub join_type: JoinType,
    pub natural: bool,
    pub relation: RelationPrimary,
    pub criteria: Option<JoinCriteria>,
    pub span: Span,
}

// ==================== Expressions ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOperator {
    Minus,
    Plus,
    BitNot,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOperator {
    Or,
    And,
    Eq,
    NullSafeEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    BitOr,
    BitXor,
    BitAnd,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    IntDivide,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExpressionKind {
    Literal(Literal),
    Column(QualifiedName),
    /// `*` or `t.*`
    Star { qualifier: Option<QualifiedName> },
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
    Binary {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Between {
        expr: Box<Expression>,
        negated: bool,
        low: Box<Expression>,
        high: Box<Expression>,
    },
    InList {
        expr: Box<Expression>,
        negated: bool,
        list: Vec<Expression>,
    },
    InSubquery {
        expr: Box<Expression>,
        negated: bool,
        query: Box<Query>,
    },
    Like {
        expr: Box<Expression>,
        negated: bool,
        /// RLIKE / REGEXP
        regex: bool,
        pattern: Box<Expression>,
    },
    IsNull {
        expr: Box<Expression>,
        negated: bool,
    },
    Exists(Box<Query>),
    Function {
        name: QualifiedName,
        distinct: bool,
        args: Vec<Expression>,
    },
    Case {
        operand: Option<Box<Expression>>,
        branches: Vec<WhenBranch>,
        else_result: Option<Box<Expression>>,
    },
    Cast {
        expr: Box<Expression>,
        data_type: DataType,
    },
    CurrentDate,
    CurrentTimestamp,
    Subquery(Box<Query>),
    Row(Vec<Expression>),
    Nested(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhenBranch {
    pub condition: Expression,
    pub result: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DataType {
    /// `INT`, `DECIMAL(10, 2)`
    Primitive { name: String, params: Vec<u32> },
    Array(Box<DataType>),
    Map(Box<DataType>, Box<DataType>),
}
