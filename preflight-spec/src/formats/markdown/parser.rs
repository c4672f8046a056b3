//! Markdown parsing (dialect text → Spec)
//!
//! Pipeline: source → front matter split → Comrak top-level blocks → section
//! state machine → validated [`Spec`].
//!
//! The walk keeps one piece of state per concern: the H1 description being
//! accumulated, the `##` section currently open, and, inside
//! `## Data Sources`, the stub being assembled. A stub is flushed (validated
//! and appended) when the next `#`, `##` or `###` heading starts, or when the
//! document ends. A later `#` heading renames the spec and resumes the
//! description: its paragraphs are added to the ones already collected.

use super::blocks::{top_level_blocks, Block, LocatedBlock};
use super::directive;
use super::frontmatter::extract_front_matter;
use crate::error::{ParseErrorKind, SpecParseError};
use crate::model::{ResultFormat, Spec, Stub, StubMode, StubPayload, SUPPORTED_VERSIONS};

const SPEC_VERSION_KEY: &str = "spec-version";

/// Parse a spec document. `filename` is only used for error context.
pub fn parse_spec(source: &str, filename: Option<&str>) -> Result<Spec, SpecParseError> {
    let front_matter = extract_front_matter(source, filename)?;

    let spec_version = front_matter
        .metadata
        .get(SPEC_VERSION_KEY)
        .cloned()
        .ok_or_else(|| {
            SpecParseError::new(ParseErrorKind::MissingSpecVersion).with_filename(filename)
        })?;
    if !SUPPORTED_VERSIONS.contains(&spec_version.as_str()) {
        return Err(
            SpecParseError::new(ParseErrorKind::UnsupportedSpecVersion(spec_version))
                .with_filename(filename),
        );
    }

    let blocks = top_level_blocks(&front_matter.body);
    let mut reader = SpecReader::new(filename, front_matter.body_line_offset);
    for located in blocks {
        reader.visit(located)?;
    }
    let spec = reader.finish(spec_version)?;

    tracing::debug!(
        name = %spec.name,
        stubs = spec.data_sources.len(),
        filename = filename.unwrap_or("<memory>"),
        "parsed spec"
    );
    Ok(spec)
}

/// The `##` section the walk is currently inside.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Section {
    Query,
    DataSources,
    ExpectedResult,
    Flow,
    Other(String),
}

impl Section {
    fn from_heading(text: &str) -> Self {
        match text.trim() {
            "Query" => Section::Query,
            "Data Sources" => Section::DataSources,
            "Expected Result" => Section::ExpectedResult,
            "Flow" => Section::Flow,
            other => Section::Other(other.to_string()),
        }
    }
}

/// A stub under construction, consumed by [`StubBuilder::build`].
#[derive(Debug)]
struct StubBuilder {
    label: String,
    line: usize,
    directives: Vec<String>,
    parameters: Option<String>,
    response: Option<String>,
    messages: Vec<String>,
    pending_label: Option<String>,
}

impl StubBuilder {
    fn new(label: String, line: usize) -> Self {
        Self {
            label,
            line,
            directives: Vec::new(),
            parameters: None,
            response: None,
            messages: Vec::new(),
            pending_label: None,
        }
    }

    fn paragraph(&mut self, text: &str) {
        let text = text.trim();
        self.pending_label = text
            .strip_suffix(':')
            .map(|label| label.trim().to_string());
    }

    fn fenced_block(&mut self, content: String) {
        match self.pending_label.take().as_deref() {
            Some("Response") => self.response = Some(content),
            Some("Message") => self.messages.push(content),
            Some("Request") => self.parameters = Some(content),
            _ => {}
        }
    }

    fn build(self, filename: Option<&str>) -> Result<Stub, SpecParseError> {
        let located = |kind: ParseErrorKind, section: &str| {
            SpecParseError::new(kind)
                .with_filename(filename)
                .with_section(section)
                .at_line(self.line)
        };

        let directives = directive::parse_all(&self.directives);
        if directives.is_empty() {
            return Err(located(
                ParseErrorKind::MissingDirective {
                    label: self.label.clone(),
                },
                "Data Sources",
            ));
        }

        let operation_name = directives
            .get("operation")
            .cloned()
            .ok_or_else(|| located(ParseErrorKind::MissingOperationName, &self.label))?;

        let mode_value = directives.get("mode").map(String::as_str);
        if let Some(value) = mode_value.filter(|v| !StubMode::is_known_directive_value(v)) {
            tracing::warn!(
                stub = %self.label,
                operation = %operation_name,
                mode = value,
                "unrecognized stub mode, treating as request-response"
            );
        }

        let payload = match StubMode::from_directive_value(mode_value) {
            StubMode::RequestResponse => StubPayload::RequestResponse {
                parameters: self.parameters,
                response: self.response,
            },
            StubMode::Stream => {
                if self.messages.is_empty() {
                    return Err(located(ParseErrorKind::EmptyStream, &self.label));
                }
                StubPayload::Stream {
                    messages: self.messages,
                }
            }
        };

        tracing::trace!(stub = %self.label, operation = %operation_name, "flushed stub");
        Ok(Stub {
            label: self.label,
            operation_name,
            payload,
        })
    }
}

struct SpecReader<'f> {
    filename: Option<&'f str>,
    line_offset: usize,

    name: Option<String>,
    describing: bool,
    description_parts: Vec<String>,
    description: Option<String>,

    section: Option<Section>,
    saw_data_sources: bool,
    stub: Option<StubBuilder>,

    query: Option<String>,
    data_sources: Vec<Stub>,
    expected_result: Option<String>,
    result_format: ResultFormat,
    flow: Option<String>,
}

impl<'f> SpecReader<'f> {
    fn new(filename: Option<&'f str>, line_offset: usize) -> Self {
        Self {
            filename,
            line_offset,
            name: None,
            describing: false,
            description_parts: Vec::new(),
            description: None,
            section: None,
            saw_data_sources: false,
            stub: None,
            query: None,
            data_sources: Vec::new(),
            expected_result: None,
            result_format: ResultFormat::Json,
            flow: None,
        }
    }

    fn visit(&mut self, located: LocatedBlock) -> Result<(), SpecParseError> {
        let line = located.line + self.line_offset;
        match located.block {
            Block::Heading { level: 1, text } => {
                if self.in_data_sources() {
                    self.flush_stub()?;
                }
                self.name = Some(text);
                self.describing = true;
                self.section = None;
            }
            Block::Heading { level: 2, text } => {
                self.end_description();
                if self.in_data_sources() {
                    self.flush_stub()?;
                }
                let section = Section::from_heading(&text);
                if section == Section::DataSources {
                    self.saw_data_sources = true;
                }
                self.section = Some(section);
            }
            Block::Heading { level: 3, text } => {
                if self.in_data_sources() {
                    self.flush_stub()?;
                    self.stub = Some(StubBuilder::new(text, line));
                }
            }
            Block::Heading { .. } => {}
            Block::Paragraph { text } => {
                if self.describing {
                    self.description_parts.push(text);
                } else if let Some(stub) = self.open_stub() {
                    stub.paragraph(&text);
                }
            }
            Block::Html { literal } => {
                if let Some(stub) = self.open_stub() {
                    stub.directives.push(literal.trim().to_string());
                }
            }
            Block::FencedCode { info, literal } => {
                let content = literal.trim_end().to_string();
                match &self.section {
                    Some(Section::Query) => self.query = Some(content),
                    Some(Section::ExpectedResult) => {
                        self.result_format = ResultFormat::from_info_string(&info);
                        self.expected_result = Some(content);
                    }
                    Some(Section::Flow) => self.flow = Some(content),
                    Some(Section::DataSources) => {
                        if let Some(stub) = self.stub.as_mut() {
                            stub.fenced_block(content);
                        }
                    }
                    Some(Section::Other(_)) | None => {}
                }
            }
        }
        Ok(())
    }

    fn in_data_sources(&self) -> bool {
        self.section == Some(Section::DataSources)
    }

    fn open_stub(&mut self) -> Option<&mut StubBuilder> {
        if self.in_data_sources() {
            self.stub.as_mut()
        } else {
            None
        }
    }

    fn end_description(&mut self) {
        if !self.describing {
            return;
        }
        self.describing = false;
        let joined = self.description_parts.join("\n\n");
        self.description = (!joined.trim().is_empty()).then_some(joined);
    }

    fn flush_stub(&mut self) -> Result<(), SpecParseError> {
        if let Some(builder) = self.stub.take() {
            let stub = builder.build(self.filename)?;
            self.data_sources.push(stub);
        }
        Ok(())
    }

    fn finish(mut self, spec_version: String) -> Result<Spec, SpecParseError> {
        self.end_description();
        if self.in_data_sources() {
            self.flush_stub()?;
        }

        let filename = self.filename;
        let fail = |kind: ParseErrorKind| SpecParseError::new(kind).with_filename(filename);

        let name = self.name.ok_or_else(|| fail(ParseErrorKind::MissingHeading))?;
        let query = self
            .query
            .ok_or_else(|| fail(ParseErrorKind::MissingSection("Query".to_string())))?;
        if !self.saw_data_sources {
            return Err(fail(ParseErrorKind::MissingSection(
                "Data Sources".to_string(),
            )));
        }
        if self.data_sources.is_empty() {
            return Err(fail(ParseErrorKind::EmptyDataSources).with_section("Data Sources"));
        }
        let expected_result = self.expected_result.ok_or_else(|| {
            fail(ParseErrorKind::MissingSection("Expected Result".to_string()))
        })?;

        Ok(Spec {
            spec_version,
            name,
            description: self.description,
            query,
            data_sources: self.data_sources,
            expected_result,
            result_format: self.result_format,
            flow: self.flow,
        })
    }
}
