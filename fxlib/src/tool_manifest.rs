use crate::errors::{FxLibError, FxLibResult};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

pub const DEFAULT_RUNNER: &str = "dotnet";

/// The settings file packed alongside a .NET tool, naming the command it
/// installs and how to run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolManifest {
    pub command_name: String,
    pub entry_point: String,
    pub runner: String,
}

impl ToolManifest {
    pub fn new<S, T>(command_name: S, entry_point: T) -> Self
    where S: Into<String>,
          T: Into<String>
    {
        ToolManifest {
            command_name: command_name.into(),
            entry_point: entry_point.into(),
            runner: DEFAULT_RUNNER.to_owned(),
        }
    }

    pub fn with_runner<S: Into<String>>(mut self, runner: S) -> Self {
        self.runner = runner.into();
        self
    }

    pub fn to_xml(&self) -> FxLibResult<String> {
        if self.command_name.trim().is_empty() {
            return Err(FxLibError::InvalidToolManifest("the command name is empty".to_owned()));
        }
        if self.entry_point.trim().is_empty() {
            return Err(FxLibError::InvalidToolManifest("the entry point is empty".to_owned()));
        }

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let mut root = BytesStart::new("DotNetCliTool");
        root.push_attribute(("Version", "1"));
        writer.write_event(Event::Start(root))?;
        writer.write_event(Event::Start(BytesStart::new("Commands")))?;

        let mut command = BytesStart::new("Command");
        command.push_attribute(("Name", self.command_name.as_str()));
        command.push_attribute(("EntryPoint", self.entry_point.as_str()));
        command.push_attribute(("Runner", self.runner.as_str()));
        writer.write_event(Event::Empty(command))?;

        writer.write_event(Event::End(BytesEnd::new("Commands")))?;
        writer.write_event(Event::End(BytesEnd::new("DotNetCliTool")))?;

        Ok(String::from_utf8(writer.into_inner())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Reader;

    /// (element, [(attribute, value)]) for every start/empty element.
    fn elements(xml: &str) -> Vec<(String, Vec<(String, String)>)> {
        let mut reader = Reader::from_str(xml);
        let mut result = vec![];
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) | Event::Empty(e) => {
                    let name = String::from_utf8(e.name().as_ref().to_vec()).unwrap();
                    let attrs = e.attributes()
                        .map(|a| {
                            let a = a.unwrap();
                            (String::from_utf8(a.key.as_ref().to_vec()).unwrap(), a.unescape_value().unwrap().into_owned())
                        })
                        .collect();
                    result.push((name, attrs));
                }
                Event::Eof => break,
                _ => {}
            }
        }
        result
    }

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    pub fn writes_command_triple() {
        let xml = ToolManifest::new("mytool", "mytool.dll").to_xml().unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert_eq!(elements(&xml), vec![
            ("DotNetCliTool".to_owned(), attrs(&[("Version", "1")])),
            ("Commands".to_owned(), vec![]),
            ("Command".to_owned(), attrs(&[("Name", "mytool"), ("EntryPoint", "mytool.dll"), ("Runner", "dotnet")])),
        ]);
    }

    #[test]
    pub fn custom_runner_and_escaping() {
        let xml = ToolManifest::new("a&b", "a&b.dll").with_runner("executable").to_xml().unwrap();
        assert!(xml.contains("a&amp;b"));
        let command = &elements(&xml)[2];
        assert_eq!(command.1, attrs(&[("Name", "a&b"), ("EntryPoint", "a&b.dll"), ("Runner", "executable")]));
    }

    #[test]
    pub fn empty_fields_are_rejected() {
        assert!(ToolManifest::new("", "x.dll").to_xml().is_err());
        assert!(ToolManifest::new("x", " ").to_xml().is_err());
    }
}
