// Command line handling
// The only argument is an optional listening port

use crate::error::ServerError;

/// Parse the positional arguments (program name already skipped).
///
/// Returns `Ok(None)` when no port was given.
pub fn parse_port_arg<I>(args: I) -> Result<Option<u16>, ServerError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();

    let Some(port) = args.next() else {
        return Ok(None);
    };

    if let Some(extra) = args.next() {
        return Err(ServerError::UnexpectedArgument(extra));
    }

    port.trim()
        .parse::<u16>()
        .map(Some)
        .map_err(|_| ServerError::InvalidPort(port))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_no_argument() {
        assert_eq!(parse_port_arg(args(&[])).unwrap(), None);
    }

    #[test]
    fn test_explicit_port() {
        assert_eq!(parse_port_arg(args(&["9090"])).unwrap(), Some(9090));
    }

    #[test]
    fn test_invalid_port() {
        assert!(matches!(
            parse_port_arg(args(&["abc"])),
            Err(ServerError::InvalidPort(p)) if p == "abc"
        ));
        assert!(matches!(
            parse_port_arg(args(&["70000"])),
            Err(ServerError::InvalidPort(_))
        ));
    }

    #[test]
    fn test_extra_argument() {
        assert!(matches!(
            parse_port_arg(args(&["8000", "9000"])),
            Err(ServerError::UnexpectedArgument(a)) if a == "9000"
        ));
    }
}
