use crate::error::{Error, ErrorKind};

pub type Result<T> = std::result::Result<T, Error>;

/// Checks a caller-supplied argument, returning `InvalidArgument` from the enclosing
/// function when the condition does not hold.
#[macro_export]
macro_rules! verify_arg {
    ($name:expr, $expr:expr) => {{
        let result = $expr;
        $crate::result::verify_arg(result, stringify!($name), stringify!($expr))?;
    }};
}

/// Checks a property of decoded data, returning `InvalidFormat` from the enclosing
/// function when the condition does not hold.
#[macro_export]
macro_rules! verify_data {
    ($name:expr, $expr:expr) => {{
        let result = $expr;
        $crate::result::verify_data(result, stringify!($name), stringify!($expr))?;
    }};
}

#[inline]
pub fn verify_arg(predicate: bool, name: &str, condition: &str) -> Result<()> {
    if predicate {
        Ok(())
    } else {
        Err(invalid(ErrorKind::InvalidArgument {
            name: name.to_string(),
            message: condition.to_string(),
        }))
    }
}

#[inline]
pub fn verify_data(predicate: bool, name: &str, condition: &str) -> Result<()> {
    if predicate {
        Ok(())
    } else {
        Err(invalid(ErrorKind::InvalidFormat {
            element: name.to_string(),
            message: condition.to_string(),
        }))
    }
}

#[cold]
fn invalid(kind: ErrorKind) -> Error {
    kind.into()
}
