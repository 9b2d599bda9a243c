use std::io::Write;

use varasto_mem::DynamicArray;

use super::*;

/// Ordered segments a log line is rendered from.
#[derive(Default)]
pub struct LogFmt {
    segments: DynamicArray<SegmentSpec>,
}

impl LogFmt {

    /// `<tag> <message>` with the tag painted in `color`.
    pub fn tagged(tag: &str, color: Color) -> Result<Self> {
        let mut fmt = Self::default();
        LogFmtBuilder::new(&mut fmt)
            .text(tag, |spec| spec.with_color_spec(|c| { c.set_fg(Some(color)).set_bold(true); }))?
            .text(" ", |spec| spec)?
            .message(|spec| spec)?;
        Ok(fmt)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn clear(&mut self) {
        self.segments.clear();
    }

    /// Renders one line, newline included, into `out`.
    pub fn write_line<W>(&self, out: &mut W, msg: core::fmt::Arguments) -> Result<()>
        where
            W: WriteColor,
    {
        for segment in self {
            match segment {
                SegmentSpec::Message(log_spec) => {
                    if let Some(color_spec) = &log_spec.color_spec {
                        out.set_color(color_spec)?;
                        write!(out, "{}", msg)?;
                        out.reset()?;
                    } else {
                        write!(out, "{}", msg)?;
                    }
                },
                SegmentSpec::Text(text, log_spec) => {
                    if let Some(color_spec) = &log_spec.color_spec {
                        out.set_color(color_spec)?;
                        out.write_all(text.as_bytes())?;
                        out.reset()?;
                    } else {
                        out.write_all(text.as_bytes())?;
                    }
                },
            }
        }
        out.write_all(b"\n")?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a LogFmt {

    type Item = &'a SegmentSpec;
    type IntoIter = core::slice::Iter<'a, SegmentSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[derive(Default, Clone)]
pub struct LogSpec {
    pub color_spec: Option<ColorSpec>,
}

impl LogSpec {

    #[inline(always)]
    pub fn with_color_spec(mut self, mut f: impl FnMut(&mut ColorSpec)) -> Self {
        let color_spec = self.color_spec.insert(ColorSpec::new());
        f(color_spec);
        self
    }
}

pub enum SegmentSpec {
    Message(LogSpec),
    Text(CompactString, LogSpec),
}

pub struct LogFmtBuilder<'a> {
    fmt: &'a mut LogFmt,
}

impl<'a> LogFmtBuilder<'a> {

    /// Starts a builder over `fmt`, discarding its previous segments.
    #[inline(always)]
    pub fn new(fmt: &'a mut LogFmt) -> Self {
        fmt.clear();
        Self {
            fmt,
        }
    }

    #[inline(always)]
    pub fn message(&mut self, mut f: impl FnMut(LogSpec) -> LogSpec) -> Result<&mut Self> {
        self.fmt.segments.push(SegmentSpec::Message(f(Default::default())))?;
        Ok(self)
    }

    #[inline(always)]
    pub fn text(&mut self, text: &str, mut f: impl FnMut(LogSpec) -> LogSpec) -> Result<&mut Self> {
        self.fmt.segments.push(SegmentSpec::Text(CompactString::new(text), f(Default::default())))?;
        Ok(self)
    }
}
