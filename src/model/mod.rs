pub mod row;
pub mod table;

pub use self::row::{Entry, Field, InvalidMedal, Medal, Row, RowFields, RowId, RowKind, Scores, JUDGE_COUNT};
pub use self::table::Table;
