//! Stage widget for ratatui

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Widget},
};

use crate::fx::{ElementKind, Stage};

/// A widget that draws every element of a stage, scaled to the area
pub struct StageView<'a> {
    stage: &'a Stage,
    tint: (u8, u8, u8),
    block: Option<Block<'a>>,
}

impl<'a> StageView<'a> {
    pub fn new(stage: &'a Stage) -> Self {
        Self {
            stage,
            tint: (0, 255, 65),
            block: None,
        }
    }

    /// Base colour, dimmed by each element's opacity
    pub fn tint(mut self, r: u8, g: u8, b: u8) -> Self {
        self.tint = (r, g, b);
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn render_stage(&self, area: Rect, buf: &mut Buffer) {
        let (width, height) = (self.stage.width(), self.stage.height());
        if area.width == 0 || area.height == 0 || width <= 0.0 || height <= 0.0 {
            return;
        }

        for (_, element) in self.stage.iter() {
            let (x, y) = element.position();
            if x < 0.0 || y < 0.0 || x >= width || y >= height {
                continue;
            }

            let col = ((x / width) * area.width as f32) as u16;
            let row = ((y / height) * area.height as f32) as u16;
            let screen_x = area.x + col.min(area.width - 1);
            let screen_y = area.y + row.min(area.height - 1);

            let symbol = match element.kind {
                ElementKind::Particle { size } if size < 2.0 => "·".to_string(),
                ElementKind::Particle { size } if size < 3.5 => "•".to_string(),
                ElementKind::Particle { .. } => "●".to_string(),
                ElementKind::Glyph { symbol, .. } => symbol.to_string(),
            };

            let alpha = element.opacity.clamp(0.0, 1.0);
            let shade = |c: u8| (c as f32 * alpha) as u8;
            let style = Style::default().fg(Color::Rgb(
                shade(self.tint.0),
                shade(self.tint.1),
                shade(self.tint.2),
            ));

            buf.set_string(screen_x, screen_y, symbol, style);
        }
    }
}

impl Widget for StageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        self.render_stage(inner_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::Element;

    #[test]
    fn test_empty_stage() {
        let stage = Stage::new(100.0, 100.0);
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        StageView::new(&stage).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), " ");
    }

    #[test]
    fn test_glyph_scaled_into_area() {
        let mut stage = Stage::new(100.0, 50.0);
        stage.append(Element::new(
            ElementKind::Glyph { symbol: '1', font_size: 16.0 },
            50.0,
            25.0,
            1.0,
        ));
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        StageView::new(&stage).render(area, &mut buf);
        assert_eq!(buf[(5, 2)].symbol(), "1");
    }

    #[test]
    fn test_offstage_elements_skipped() {
        let mut stage = Stage::new(100.0, 50.0);
        let mut el = Element::new(ElementKind::Particle { size: 4.0 }, 10.0, 10.0, 1.0);
        el.translate = (0.0, -40.0);
        stage.append(el);
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        StageView::new(&stage).render(area, &mut buf);
        for x in 0..10 {
            for y in 0..5 {
                assert_eq!(buf[(x, y)].symbol(), " ");
            }
        }
    }

    #[test]
    fn test_tint_dimmed_by_opacity() {
        let mut stage = Stage::new(100.0, 50.0);
        stage.append(Element::new(ElementKind::Particle { size: 1.0 }, 0.0, 0.0, 0.5));
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        StageView::new(&stage).tint(200, 100, 0).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].fg, Color::Rgb(100, 50, 0));
    }

    #[test]
    fn test_with_block() {
        let stage = Stage::new(100.0, 100.0);
        let view = StageView::new(&stage).block(Block::default().title("Test"));
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);
    }
}
