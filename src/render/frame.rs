use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{AreaPrimitive, LinePrimitive, RectPrimitive, TextPrimitive};

/// Backend-agnostic scene for one chart draw pass.
///
/// Backends draw in field order: rects (region bands first), areas, lines,
/// then texts.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub rects: Vec<RectPrimitive>,
    pub areas: Vec<AreaPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            rects: Vec::new(),
            areas: Vec::new(),
            lines: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    #[must_use]
    pub fn with_area(mut self, area: AreaPrimitive) -> Self {
        self.areas.push(area);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        let mut clip_ids: Vec<&str> = Vec::new();
        for rect in &self.rects {
            rect.validate()?;
            if let Some(clip_id) = rect.clip_id.as_deref() {
                if clip_ids.contains(&clip_id) {
                    return Err(ChartError::InvalidData(format!(
                        "clip id `{clip_id}` used more than once in one frame"
                    )));
                }
                clip_ids.push(clip_id);
            }
        }
        for area in &self.areas {
            area.validate()?;
        }
        for line in &self.lines {
            line.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
            && self.rects.is_empty()
            && self.areas.is_empty()
            && self.texts.is_empty()
    }
}
