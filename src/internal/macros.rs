// ========================================================================= //

macro_rules! malformed {
    ($table:expr, $e:expr) => {
        return Err($crate::internal::error::Error::MalformedTable {
            table: ($table).to_string(),
            message: ($e).to_string(),
        })
    };
    ($table:expr, $fmt:expr, $($arg:tt)+) => {
        return Err($crate::internal::error::Error::MalformedTable {
            table: ($table).to_string(),
            message: format!($fmt, $($arg)+),
        })
    };
}

macro_rules! missing_table {
    ($table:expr) => {
        return Err($crate::internal::error::Error::MissingTable(
            ($table).to_string(),
        ))
    };
}

// ========================================================================= //
