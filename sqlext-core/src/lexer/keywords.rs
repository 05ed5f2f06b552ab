//! The dialect's keyword vocabulary.

use serde::Serialize;

macro_rules! define_keywords {
    ($($variant:ident = $text:literal $(| $alias:literal)*;)+) => {
        /// Every word the lexer recognizes as a keyword. Matching is case-insensitive.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub enum Keyword {
            $($variant,)+
        }

        impl Keyword {
            pub const ALL: &'static [Keyword] = &[$(Keyword::$variant,)+];

            /// Canonical upper-case spelling
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Keyword::$variant => $text,)+
                }
            }

            /// Resolve a word (any case) to a keyword, including alternate spellings.
            pub fn lookup(word: &str) -> Option<Keyword> {
                match word.to_ascii_uppercase().as_str() {
                    $($text $(| $alias)* => Some(Keyword::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

define_keywords! {
    Select = "SELECT";
    From = "FROM";
    Add = "ADD";
    As = "AS";
    All = "ALL";
    Distinct = "DISTINCT";
    Where = "WHERE";
    Group = "GROUP";
    By = "BY";
    Grouping = "GROUPING";
    Sets = "SETS";
    Cube = "CUBE";
    Rollup = "ROLLUP";
    Order = "ORDER";
    Having = "HAVING";
    Limit = "LIMIT";
    At = "AT";
    Or = "OR";
    And = "AND";
    In = "IN";
    Not = "NOT";
    No = "NO";
    Exists = "EXISTS";
    Between = "BETWEEN";
    Like = "LIKE";
    RLike = "RLIKE" | "REGEXP";
    Is = "IS";
    Null = "NULL";
    True = "TRUE";
    False = "FALSE";
    Nulls = "NULLS";
    Asc = "ASC";
    Desc = "DESC";
    For = "FOR";
    Interval = "INTERVAL";
    Case = "CASE";
    When = "WHEN";
    Then = "THEN";
    Else = "ELSE";
    End = "END";
    Join = "JOIN";
    Cross = "CROSS";
    Outer = "OUTER";
    Inner = "INNER";
    Left = "LEFT";
    Semi = "SEMI";
    Right = "RIGHT";
    Full = "FULL";
    Natural = "NATURAL";
    On = "ON";
    Lateral = "LATERAL";
    Window = "WINDOW";
    Over = "OVER";
    Partition = "PARTITION";
    Range = "RANGE";
    Rows = "ROWS";
    Unbounded = "UNBOUNDED";
    Preceding = "PRECEDING";
    Following = "FOLLOWING";
    Current = "CURRENT";
    First = "FIRST";
    After = "AFTER";
    Last = "LAST";
    Row = "ROW";
    With = "WITH";
    Values = "VALUES";
    Create = "CREATE";
    Table = "TABLE";
    View = "VIEW";
    Replace = "REPLACE";
    Insert = "INSERT";
    Delete = "DELETE";
    Into = "INTO";
    Describe = "DESCRIBE";
    Explain = "EXPLAIN";
    Format = "FORMAT";
    Logical = "LOGICAL";
    Codegen = "CODEGEN";
    Cost = "COST";
    Cast = "CAST";
    Show = "SHOW";
    Tables = "TABLES";
    Columns = "COLUMNS";
    Column = "COLUMN";
    Use = "USE";
    Partitions = "PARTITIONS";
    Functions = "FUNCTIONS";
    Drop = "DROP";
    Merge = "MERGE";
    Lifecycle = "LIFECYCLE";
    Union = "UNION";
    Except = "EXCEPT";
    SetMinus = "MINUS";
    Intersect = "INTERSECT";
    To = "TO";
    TableSample = "TABLESAMPLE";
    Stratify = "STRATIFY";
    Alter = "ALTER";
    Rename = "RENAME";
    Array = "ARRAY";
    Map = "MAP";
    Struct = "STRUCT";
    Comment = "COMMENT";
    Set = "SET";
    Reset = "RESET";
    Data = "DATA";
    Start = "START";
    Transaction = "TRANSACTION";
    Commit = "COMMIT";
    Rollback = "ROLLBACK";
    Macro = "MACRO";
    Ignore = "IGNORE";
    If = "IF";
    Div = "DIV";
    Percent = "PERCENT";
    Bucket = "BUCKET";
    Out = "OUT";
    Of = "OF";
    Sort = "SORT";
    Cluster = "CLUSTER";
    Distribute = "DISTRIBUTE";
    Overwrite = "OVERWRITE";
    Transform = "TRANSFORM";
    Reduce = "REDUCE";
    Using = "USING";
    Serde = "SERDE";
    SerdeProperties = "SERDEPROPERTIES";
    RecordReader = "RECORDREADER";
    RecordWriter = "RECORDWRITER";
    Delimited = "DELIMITED";
    Fields = "FIELDS";
    Terminated = "TERMINATED";
    Collection = "COLLECTION";
    Items = "ITEMS";
    Keys = "KEYS";
    Escaped = "ESCAPED";
    Lines = "LINES";
    Separated = "SEPARATED";
    Function = "FUNCTION";
    Extended = "EXTENDED";
    Refresh = "REFRESH";
    Clear = "CLEAR";
    Cache = "CACHE";
    Uncache = "UNCACHE";
    Lazy = "LAZY";
    Formatted = "FORMATTED";
    Global = "GLOBAL";
    Temporary = "TEMPORARY" | "TEMP";
    Options = "OPTIONS";
    Unset = "UNSET";
    TblProperties = "TBLPROPERTIES";
    DbProperties = "DBPROPERTIES";
    Buckets = "BUCKETS";
    Skewed = "SKEWED";
    Stored = "STORED";
    Directories = "DIRECTORIES";
    Location = "LOCATION";
    Exchange = "EXCHANGE";
    Archive = "ARCHIVE";
    Unarchive = "UNARCHIVE";
    FileFormat = "FILEFORMAT";
    Touch = "TOUCH";
    Compact = "COMPACT";
    Concatenate = "CONCATENATE";
    Change = "CHANGE";
    Cascade = "CASCADE";
    Restrict = "RESTRICT";
    Clustered = "CLUSTERED";
    Sorted = "SORTED";
    Purge = "PURGE";
    InputFormat = "INPUTFORMAT";
    OutputFormat = "OUTPUTFORMAT";
    Database = "DATABASE" | "SCHEMA";
    Databases = "DATABASES" | "SCHEMAS";
    Dfs = "DFS";
    Truncate = "TRUNCATE";
    Analyze = "ANALYZE";
    Compute = "COMPUTE";
    List = "LIST";
    Statistics = "STATISTICS";
    Partitioned = "PARTITIONED";
    External = "EXTERNAL";
    Defined = "DEFINED";
    Revoke = "REVOKE";
    Grant = "GRANT";
    Lock = "LOCK";
    Unlock = "UNLOCK";
    Msck = "MSCK";
    Repair = "REPAIR";
    Recover = "RECOVER";
    Export = "EXPORT";
    Import = "IMPORT";
    Load = "LOAD";
    Role = "ROLE";
    Roles = "ROLES";
    Compactions = "COMPACTIONS";
    Principals = "PRINCIPALS";
    Transactions = "TRANSACTIONS";
    Index = "INDEX";
    Indexes = "INDEXES";
    Locks = "LOCKS";
    Option = "OPTION";
    Anti = "ANTI";
    Local = "LOCAL";
    InPath = "INPATH";
    CurrentDate = "CURRENT_DATE";
    CurrentTimestamp = "CURRENT_TIMESTAMP";
}

impl Keyword {
    /// Reserved words can never stand in for an identifier. Every other keyword is
    /// accepted wherever the grammar expects a name.
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            Keyword::Select
                | Keyword::From
                | Keyword::Where
                | Keyword::Group
                | Keyword::Having
                | Keyword::Order
                | Keyword::Limit
                | Keyword::Union
                | Keyword::Except
                | Keyword::SetMinus
                | Keyword::Intersect
                | Keyword::Join
                | Keyword::Cross
                | Keyword::Inner
                | Keyword::Left
                | Keyword::Right
                | Keyword::Full
                | Keyword::Natural
                | Keyword::Semi
                | Keyword::Anti
                | Keyword::On
                | Keyword::Using
                | Keyword::As
                | Keyword::And
                | Keyword::Or
                | Keyword::Not
                | Keyword::In
                | Keyword::Is
                | Keyword::Like
                | Keyword::RLike
                | Keyword::Between
                | Keyword::Case
                | Keyword::When
                | Keyword::Then
                | Keyword::Else
                | Keyword::End
                | Keyword::Null
                | Keyword::True
                | Keyword::False
                | Keyword::To
                | Keyword::Into
                | Keyword::With
                | Keyword::Values
                | Keyword::Distinct
                | Keyword::All
                | Keyword::Cast
                | Keyword::Exists
                | Keyword::Interval
                | Keyword::Div
                | Keyword::Table
                | Keyword::CurrentDate
                | Keyword::CurrentTimestamp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(Keyword::lookup("select"), Some(Keyword::Select));
        assert_eq!(Keyword::lookup("SeLeCt"), Some(Keyword::Select));
        assert_eq!(Keyword::lookup("selects"), None);
    }

    #[test]
    fn test_alternate_spellings() {
        assert_eq!(Keyword::lookup("regexp"), Some(Keyword::RLike));
        assert_eq!(Keyword::lookup("temp"), Some(Keyword::Temporary));
        assert_eq!(Keyword::lookup("schema"), Some(Keyword::Database));
        assert_eq!(Keyword::lookup("schemas"), Some(Keyword::Databases));
        assert_eq!(Keyword::lookup("minus"), Some(Keyword::SetMinus));
        assert_eq!(Keyword::SetMinus.as_str(), "MINUS");
    }

    #[test]
    fn test_spelling_round_trips() {
        for kw in Keyword::ALL {
            assert_eq!(Keyword::lookup(kw.as_str()), Some(*kw), "{:?}", kw);
        }
    }

    #[test]
    fn test_extended_command_words_are_not_reserved() {
        assert!(!Keyword::Merge.is_reserved());
        assert!(!Keyword::Load.is_reserved());
        assert!(!Keyword::Export.is_reserved());
        assert!(!Keyword::Data.is_reserved());
        assert!(Keyword::Select.is_reserved());
        assert!(Keyword::To.is_reserved());
    }
}
