use crate::errors::FxLibResult;
use crate::target_framework::{TargetFramework, NETFRAMEWORK};
use log::{debug, info};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io;

const CONFIGURATION: &str = "configuration";
const STARTUP: &str = "startup";
const SUPPORTED_RUNTIME: &str = "supportedRuntime";

/// The `supportedRuntime` attributes for a .NET Framework target, or `None`
/// for targets that have no entry (including every non-.NET Framework one).
pub fn supported_runtime_for(target_framework: &TargetFramework) -> Option<(&'static str, Option<String>)> {
    if !target_framework.is_identifier(NETFRAMEWORK) {
        return None;
    }

    let v = &target_framework.version;
    if v.revision() != 0 || v.is_prerelease() {
        return None;
    }

    match (v.major(), v.minor(), v.patch()) {
        (1, 0, 0) => Some(("v1.0.3705", None)),
        (1, 1, 0) => Some(("v1.1.4322", None)),
        (2, 0, 0) | (3, 0, 0) | (3, 5, 0) => Some(("v2.0.50727", None)),
        (4, 0, 0) | (4, 5, 0) | (4, 5, 1) | (4, 5, 2) | (4, 6, 0) | (4, 6, 1) | (4, 6, 2)
        | (4, 7, 0) | (4, 7, 1) | (4, 7, 2) | (4, 8, 0) | (4, 8, 1) => {
            Some(("v4.0", Some(target_framework.long_name())))
        }
        _ => None,
    }
}

/// Adds a `supportedRuntime` element to an app.config document. Returns the
/// new document, or `None` when nothing needs to change: the target has no
/// mapping, the document has no `configuration` root, or its `startup`
/// element already names a runtime.
pub fn add_supported_runtime(existing: Option<&str>, target_framework: &TargetFramework) -> FxLibResult<Option<String>> {
    let (version, sku) = match supported_runtime_for(target_framework) {
        Some(runtime) => runtime,
        None => {
            debug!("No supportedRuntime mapping for {}", target_framework);
            return Ok(None);
        }
    };

    match existing {
        Some(doc) if !doc.trim().is_empty() => insert_into(doc, version, sku.as_deref()),
        _ => new_document(version, sku.as_deref()).map(Some),
    }
}

fn new_document(version: &str, sku: Option<&str>) -> FxLibResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(CONFIGURATION)))?;
    write_startup(&mut writer, version, sku)?;
    writer.write_event(Event::End(BytesEnd::new(CONFIGURATION)))?;

    info!("Created app.config with supportedRuntime {}", version);
    Ok(String::from_utf8(writer.into_inner())?)
}

fn insert_into(doc: &str, version: &str, sku: Option<&str>) -> FxLibResult<Option<String>> {
    let mut reader = Reader::from_str(doc);
    let mut writer = Writer::new(Vec::new());

    let mut depth = 0usize;
    let mut root_is_configuration = false;
    let mut in_startup = false;
    let mut saw_startup = false;
    let mut has_runtime = false;
    let mut inserted = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                let name = e.name();
                if depth == 1 {
                    root_is_configuration = name.as_ref() == CONFIGURATION.as_bytes();
                } else if depth == 2 && root_is_configuration && name.as_ref() == STARTUP.as_bytes() {
                    in_startup = true;
                    saw_startup = true;
                } else if depth == 3 && in_startup && name.as_ref() == SUPPORTED_RUNTIME.as_bytes() {
                    has_runtime = true;
                }
                writer.write_event(Event::Start(e))?;
            }
            Event::Empty(e) => {
                let name = e.name();
                if depth == 0 && name.as_ref() == CONFIGURATION.as_bytes() {
                    writer.write_event(Event::Start(e.clone()))?;
                    write_startup(&mut writer, version, sku)?;
                    writer.write_event(Event::End(e.to_end()))?;
                    inserted = true;
                } else if depth == 1 && root_is_configuration && name.as_ref() == STARTUP.as_bytes() {
                    saw_startup = true;
                    writer.write_event(Event::Start(e.clone()))?;
                    write_supported_runtime(&mut writer, version, sku)?;
                    writer.write_event(Event::End(e.to_end()))?;
                    inserted = true;
                } else {
                    if depth == 2 && in_startup && name.as_ref() == SUPPORTED_RUNTIME.as_bytes() {
                        has_runtime = true;
                    }
                    writer.write_event(Event::Empty(e))?;
                }
            }
            Event::End(e) => {
                let name = e.name();
                if depth == 2 && in_startup && name.as_ref() == STARTUP.as_bytes() {
                    if !has_runtime {
                        write_supported_runtime(&mut writer, version, sku)?;
                        inserted = true;
                    }
                    in_startup = false;
                } else if depth == 1 && root_is_configuration && !saw_startup {
                    write_startup(&mut writer, version, sku)?;
                    inserted = true;
                }
                depth = depth.saturating_sub(1);
                writer.write_event(Event::End(e))?;
            }
            Event::Eof => break,
            e => writer.write_event(e)?,
        }
    }

    if !inserted {
        debug!("app.config left unchanged");
        return Ok(None);
    }

    info!("Added supportedRuntime {} to app.config", version);
    Ok(Some(String::from_utf8(writer.into_inner())?))
}

fn write_startup<W: io::Write>(writer: &mut Writer<W>, version: &str, sku: Option<&str>) -> FxLibResult<()> {
    writer.write_event(Event::Start(BytesStart::new(STARTUP)))?;
    write_supported_runtime(writer, version, sku)?;
    writer.write_event(Event::End(BytesEnd::new(STARTUP)))?;
    Ok(())
}

fn write_supported_runtime<W: io::Write>(writer: &mut Writer<W>, version: &str, sku: Option<&str>) -> FxLibResult<()> {
    let mut element = BytesStart::new(SUPPORTED_RUNTIME);
    element.push_attribute(("version", version));
    if let Some(sku) = sku {
        element.push_attribute(("sku", sku));
    }
    writer.write_event(Event::Empty(element))?;
    Ok(())
}
