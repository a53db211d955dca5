pub trait AsStr {
    fn as_str(&self) -> &str;
}

impl AsStr for bool {
    fn as_str(&self) -> &str {
        if *self { "true" } else { "false" }
    }
}

impl AsStr for Option<String> {
    /// Missing values are written as empty strings, which is how MSBuild
    /// represents unset metadata.
    fn as_str(&self) -> &str {
        match self {
            Some(ref s) => s.as_str(),
            None => "",
        }
    }
}
