//! Reader for Qt Linguist TS catalogs.
//!
//! Decoding is all-or-nothing: any structural problem yields a
//! [`CatalogError::Parse`] carrying the 1-based line and column of the
//! offending element, and no partial catalog is produced.

use std::collections::HashMap;

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use tracing::warn;

use crate::core::data::{Catalog, Location, Message, MessageStatus};
use crate::core::lookup::{PluralRule, PluralRules};
use crate::error::{CatalogError, Result};
use crate::utils::{build_line_index, offset_to_position};

/// Decode a TS document.
pub fn decode(content: &str) -> Result<Catalog> {
    TsReader::new(content).read_catalog()
}

/// Elements read as plain text.
const TEXT_ELEMENTS: &[&[u8]] = &[b"name", b"source", b"comment", b"translatorcomment"];

struct TsReader<'a> {
    reader: Reader<&'a [u8]>,
    content: &'a str,
    line_index: Vec<usize>,
    /// Plural slots a finished message must fill, from the `language` attribute.
    required_forms: usize,
}

/// A `<message>` being assembled, plus where it started.
struct PendingMessage {
    offset: usize,
    message: Message,
}

impl<'a> TsReader<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            reader: Reader::from_str(content),
            content,
            line_index: build_line_index(content),
            required_forms: PluralRule::English.form_count(),
        }
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> CatalogError {
        let (line, column) = offset_to_position(self.content, &self.line_index, offset);
        CatalogError::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    /// Offset of the `<` opening the markup that starts at or just before `offset`.
    fn markup_start(&self, offset: usize) -> usize {
        let bytes = self.content.as_bytes();
        if offset > 0 && bytes.get(offset) != Some(&b'<') && bytes.get(offset - 1) == Some(&b'<') {
            offset - 1
        } else {
            offset
        }
    }

    /// Next event with the byte offset it starts at.
    fn next(&mut self) -> Result<(usize, Event<'a>)> {
        let offset = self.markup_start(self.reader.buffer_position() as usize);
        match self.reader.read_event() {
            Ok(Event::Eof) => Err(self.error_at(offset, "unexpected end of document")),
            Ok(event) => Ok((offset, event)),
            Err(err) => {
                let at = self.reader.error_position() as usize;
                Err(self.error_at(at, err.to_string()))
            }
        }
    }

    fn read_catalog(mut self) -> Result<Catalog> {
        let mut catalog = Catalog::new();
        loop {
            let offset = self.markup_start(self.reader.buffer_position() as usize);
            let event = match self.reader.read_event() {
                Ok(Event::Eof) => return Err(self.error_at(offset, "missing <TS> root element")),
                Ok(event) => event,
                Err(err) => {
                    let at = self.reader.error_position() as usize;
                    return Err(self.error_at(at, err.to_string()));
                }
            };
            match event {
                Event::Start(e) if e.name().as_ref() == b"TS" => {
                    self.read_header(&e, &mut catalog, offset)?;
                    break;
                }
                Event::Empty(e) if e.name().as_ref() == b"TS" => {
                    self.read_header(&e, &mut catalog, offset)?;
                    return Ok(catalog);
                }
                Event::Start(e) | Event::Empty(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    return Err(self.error_at(offset, format!("expected <TS>, found <{}>", name)));
                }
                _ => {}
            }
        }

        loop {
            let (offset, event) = self.next()?;
            match event {
                Event::Start(e) if e.name().as_ref() == b"context" => {
                    self.read_context(&mut catalog, offset)?;
                }
                Event::Start(_) => self.skip_element()?,
                Event::End(_) => break,
                _ => {}
            }
        }
        Ok(catalog)
    }

    fn read_header(&mut self, e: &BytesStart<'_>, catalog: &mut Catalog, offset: usize) -> Result<()> {
        catalog.language = self.attribute(e, "language", offset)?;
        catalog.source_language = self.attribute(e, "sourcelanguage", offset)?;
        if let Some(language) = &catalog.language {
            self.required_forms = PluralRules::builtin().rule_for(language).form_count();
        }
        Ok(())
    }

    fn attribute(&self, e: &BytesStart<'_>, name: &str, offset: usize) -> Result<Option<String>> {
        let attr = e
            .try_get_attribute(name)
            .map_err(|err| self.error_at(offset, err.to_string()))?;
        match attr {
            Some(attr) => {
                let value = attr
                    .unescape_value()
                    .map_err(|err| self.error_at(offset, err.to_string()))?;
                Ok(Some(value.into_owned()))
            }
            None => Ok(None),
        }
    }

    fn read_context(&mut self, catalog: &mut Catalog, context_offset: usize) -> Result<()> {
        let mut name = None;
        let mut messages = Vec::new();
        // Last absolute line per file, for relative `line="+N"` values.
        let mut last_lines: HashMap<String, usize> = HashMap::new();
        let mut last_file: Option<String> = None;

        loop {
            let (offset, event) = self.next()?;
            match event {
                Event::Start(e) if e.name().as_ref() == b"name" => {
                    name = Some(self.read_text()?);
                }
                Event::Start(e) if e.name().as_ref() == b"message" => {
                    let message = self.read_message(&e, offset, &mut last_lines, &mut last_file)?;
                    messages.push(message);
                }
                Event::Empty(e) if e.name().as_ref() == b"message" => {
                    return Err(self.error_at(offset, "<message> without <source>"));
                }
                Event::Start(_) => self.skip_element()?,
                Event::End(_) => break,
                _ => {}
            }
        }

        let Some(name) = name else {
            return Err(self.error_at(context_offset, "<context> without <name>"));
        };
        catalog.add_context(&name);
        for PendingMessage { offset, message } in messages {
            catalog
                .insert(&name, message)
                .map_err(|err| self.error_at(offset, err.to_string()))?;
        }
        Ok(())
    }

    fn read_message(
        &mut self,
        start: &BytesStart<'_>,
        message_offset: usize,
        last_lines: &mut HashMap<String, usize>,
        last_file: &mut Option<String>,
    ) -> Result<PendingMessage> {
        let is_plural = self.attribute(start, "numerus", message_offset)?.as_deref() == Some("yes");
        let mut source = None;
        let mut disambiguation = None;
        let mut translator_comment = None;
        let mut locations = Vec::new();
        let mut status = MessageStatus::Unfinished;
        let mut translation = String::new();
        let mut forms = Vec::new();

        loop {
            let (offset, event) = self.next()?;
            match event {
                Event::Empty(e) if e.name().as_ref() == b"location" => {
                    locations.push(self.read_location(&e, offset, last_lines, last_file)?);
                }
                Event::Start(e) if e.name().as_ref() == b"location" => {
                    locations.push(self.read_location(&e, offset, last_lines, last_file)?);
                    self.skip_element()?;
                }
                Event::Start(e) if TEXT_ELEMENTS.contains(&e.name().as_ref()) => {
                    let text = self.read_text()?;
                    match e.name().as_ref() {
                        b"source" => source = Some(text),
                        b"comment" => disambiguation = Some(text),
                        b"translatorcomment" => translator_comment = Some(text),
                        _ => {}
                    }
                }
                Event::Empty(e) if TEXT_ELEMENTS.contains(&e.name().as_ref()) => {
                    match e.name().as_ref() {
                        b"source" => source = Some(String::new()),
                        b"translatorcomment" => translator_comment = Some(String::new()),
                        _ => {}
                    }
                }
                Event::Start(e) if e.name().as_ref() == b"translation" => {
                    status = self.read_status(&e, offset)?;
                    (translation, forms) = self.read_translation()?;
                }
                Event::Empty(e) if e.name().as_ref() == b"translation" => {
                    status = self.read_status(&e, offset)?;
                }
                Event::Start(_) => self.skip_element()?,
                Event::End(_) => break,
                _ => {}
            }
        }

        let Some(source) = source else {
            return Err(self.error_at(message_offset, "<message> without <source>"));
        };

        let mut message = Message::new(source, disambiguation.as_deref());
        message.locations = locations;
        message.translator_comment = translator_comment;
        message.is_plural = is_plural;
        if is_plural {
            message.plural_forms = if forms.is_empty() && !translation.is_empty() {
                vec![translation]
            } else {
                forms
            };
        } else {
            message.translation = translation;
        }

        if status == MessageStatus::Finished && !message.is_complete(self.required_forms) {
            let (line, _) = offset_to_position(self.content, &self.line_index, message_offset);
            warn!(line, source = %message.source_text, "finished message with missing text loaded as unfinished");
            status = MessageStatus::Unfinished;
        }
        message.status = status;

        Ok(PendingMessage {
            offset: message_offset,
            message,
        })
    }

    fn read_status(&self, e: &BytesStart<'_>, offset: usize) -> Result<MessageStatus> {
        let kind = self.attribute(e, "type", offset)?;
        MessageStatus::from_type_attribute(kind.as_deref()).ok_or_else(|| {
            self.error_at(
                offset,
                format!("unknown translation type '{}'", kind.unwrap_or_default()),
            )
        })
    }

    fn read_location(
        &self,
        e: &BytesStart<'_>,
        offset: usize,
        last_lines: &mut HashMap<String, usize>,
        last_file: &mut Option<String>,
    ) -> Result<Location> {
        let line = self
            .attribute(e, "line", offset)?
            .ok_or_else(|| self.error_at(offset, "<location> without line"))?;
        let relative = line.starts_with('+') || line.starts_with('-');

        let file_path = match self.attribute(e, "filename", offset)? {
            Some(file) if !file.is_empty() => file,
            // A relative location may omit the file it shares with the previous one.
            _ if relative && last_file.is_some() => last_file.clone().unwrap_or_default(),
            _ => return Err(self.error_at(offset, "<location> without filename")),
        };

        let bad_line = || self.error_at(offset, format!("invalid line number '{}'", line));
        let number = if relative {
            let delta: i64 = line.parse().map_err(|_| bad_line())?;
            let base = last_lines.get(&file_path).copied().unwrap_or(0) as i64;
            usize::try_from(base + delta).map_err(|_| bad_line())?
        } else {
            line.parse::<usize>().map_err(|_| bad_line())?
        };
        if number == 0 {
            return Err(bad_line());
        }

        last_lines.insert(file_path.clone(), number);
        *last_file = Some(file_path.clone());
        Ok(Location::new(file_path, number))
    }

    /// Text content up to the end of the current element.
    fn read_text(&mut self) -> Result<String> {
        let mut text = String::new();
        loop {
            let (offset, event) = self.next()?;
            match event {
                Event::Text(t) => {
                    let unescaped = t.unescape().map_err(|err| self.error_at(offset, err.to_string()))?;
                    text.push_str(&unescaped);
                }
                Event::CData(data) => text.push_str(&String::from_utf8_lossy(&data)),
                Event::Empty(e) if e.name().as_ref() == b"byte" => {
                    text.push(self.read_byte(&e, offset)?);
                }
                Event::Start(_) => self.skip_element()?,
                Event::End(_) => return Ok(text),
                _ => {}
            }
        }
    }

    /// Body of `<translation>`: direct text and `<numerusform>` slots.
    fn read_translation(&mut self) -> Result<(String, Vec<String>)> {
        let mut text = String::new();
        let mut forms = Vec::new();
        loop {
            let (offset, event) = self.next()?;
            match event {
                Event::Start(e) if e.name().as_ref() == b"numerusform" => {
                    forms.push(self.read_text()?);
                }
                Event::Empty(e) if e.name().as_ref() == b"numerusform" => {
                    forms.push(String::new());
                }
                Event::Text(t) => {
                    let unescaped = t.unescape().map_err(|err| self.error_at(offset, err.to_string()))?;
                    text.push_str(&unescaped);
                }
                Event::CData(data) => text.push_str(&String::from_utf8_lossy(&data)),
                Event::Empty(e) if e.name().as_ref() == b"byte" => {
                    text.push(self.read_byte(&e, offset)?);
                }
                Event::Start(_) => self.skip_element()?,
                Event::End(_) => break,
                _ => {}
            }
        }
        // Whitespace between slots is layout, not text.
        if !forms.is_empty() {
            text.clear();
        }
        Ok((text, forms))
    }

    /// `<byte value="xHH"/>` (hex) or `<byte value="NN"/>` (decimal).
    fn read_byte(&self, e: &BytesStart<'_>, offset: usize) -> Result<char> {
        let value = self
            .attribute(e, "value", offset)?
            .ok_or_else(|| self.error_at(offset, "<byte> without value"))?;
        let code = match value.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => value.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .ok_or_else(|| self.error_at(offset, format!("invalid byte value '{}'", value)))
    }

    /// Skip the rest of an element whose start tag was just read.
    fn skip_element(&mut self) -> Result<()> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.next()?.1 {
                Event::Start(_) => depth += 1,
                Event::End(_) => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }
}
