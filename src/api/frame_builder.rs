use crate::api::{ChartConfig, ChartGeometry};
use crate::core::{BoxedAnnotation, Color, LabelAnchor};
use crate::render::{
    AreaPrimitive, LinePrimitive, LineStrokeStyle, RectPrimitive, RenderFrame, TextHAlign,
    TextPrimitive,
};

const NO_DATA_TEXT: &str = "No data available";
const AXIS_DATE_FORMAT: &str = "%b %-d";

/// Materializes `geometry` as viewport-space draw commands.
///
/// Draw order: region bands, confidence band, grid lines, value line, axis,
/// then labels on top.
#[must_use]
pub fn build_frame(geometry: &ChartGeometry, config: &ChartConfig) -> RenderFrame {
    let style = config.style;
    let left = geometry.margins.left;
    let top = geometry.margins.top;
    let plot = geometry.plot;
    let offset = |(x, y): (f64, f64)| (left + x, top + y);

    let mut frame = RenderFrame::new(geometry.viewport);

    for band in &geometry.region_bands {
        frame.rects.push(
            RectPrimitive::new(
                left,
                top + band.y_top,
                plot.width,
                band.height(),
                band.region.color.with_alpha(style.region_fill_alpha),
            )
            .with_clip_id(band.clip_id.clone()),
        );
    }

    if geometry.confidence_band.len() >= 3 {
        frame.areas.push(AreaPrimitive::new(
            geometry.confidence_band.iter().copied().map(offset).collect(),
            style.confidence_band_color,
        ));
    }

    let grid_style = LineStrokeStyle::Dashed {
        dash: style.grid_dash_px,
        gap: style.grid_gap_px,
    };
    for tick in &geometry.ticks {
        let y = top + tick.y;
        frame.lines.push(
            LinePrimitive::new(
                left,
                y,
                left + plot.width,
                y,
                style.grid_line_width,
                style.grid_color,
            )
            .with_stroke_style(grid_style),
        );
        frame.texts.push(TextPrimitive::new(
            config.value_format.format(tick.value),
            left - style.annotation_padding_px,
            y,
            style.font_size_px,
            style.axis_color,
            TextHAlign::Right,
        ));
    }

    push_path(
        &mut frame,
        &geometry.confirmed_path,
        offset,
        style.series_line_width,
        style.series_color,
        LineStrokeStyle::Solid,
    );
    push_path(
        &mut frame,
        &geometry.projected_path,
        offset,
        style.series_line_width,
        style.series_color,
        LineStrokeStyle::Dashed {
            dash: style.projected_dash_px,
            gap: style.projected_gap_px,
        },
    );

    let axis_y = top + plot.height;
    frame.lines.push(LinePrimitive::new(
        left,
        axis_y,
        left + plot.width,
        axis_y,
        1.0,
        style.axis_color,
    ));
    let (start, end) = geometry.time_scale.domain();
    let label_y = axis_y + style.font_size_px;
    frame.texts.push(TextPrimitive::new(
        start.format(AXIS_DATE_FORMAT).to_string(),
        left,
        label_y,
        style.font_size_px,
        style.axis_color,
        TextHAlign::Left,
    ));
    if end > start {
        frame.texts.push(TextPrimitive::new(
            end.format(AXIS_DATE_FORMAT).to_string(),
            left + plot.width,
            label_y,
            style.font_size_px,
            style.axis_color,
            TextHAlign::Right,
        ));
    }

    for label in &geometry.zone_labels {
        let (background, text_color) = if label.is_active {
            (label.color, style.active_label_text_color)
        } else {
            (style.inactive_label_background, label.color)
        };
        push_annotation(
            &mut frame,
            &label.annotation,
            (left, top),
            background,
            text_color,
            config,
        );
    }

    push_annotation(
        &mut frame,
        &geometry.last_value_annotation,
        (left, top),
        style.annotation_background,
        style.annotation_color,
        config,
    );

    frame
}

/// Frame shown when the series had no complete points.
#[must_use]
pub fn build_no_data_frame(config: &ChartConfig) -> RenderFrame {
    let viewport = config.viewport;
    RenderFrame::new(viewport).with_text(TextPrimitive::new(
        NO_DATA_TEXT,
        f64::from(viewport.width) / 2.0,
        f64::from(viewport.height) / 2.0,
        config.style.font_size_px,
        config.style.annotation_color,
        TextHAlign::Center,
    ))
}

fn push_path(
    frame: &mut RenderFrame,
    path: &[(f64, f64)],
    offset: impl Fn((f64, f64)) -> (f64, f64),
    width: f64,
    color: Color,
    stroke_style: LineStrokeStyle,
) {
    for pair in path.windows(2) {
        let (x1, y1) = offset(pair[0]);
        let (x2, y2) = offset(pair[1]);
        frame.lines.push(
            LinePrimitive::new(x1, y1, x2, y2, width, color).with_stroke_style(stroke_style),
        );
    }
}

fn push_annotation(
    frame: &mut RenderFrame,
    annotation: &BoxedAnnotation,
    (dx, dy): (f64, f64),
    background: Color,
    text_color: Color,
    config: &ChartConfig,
) {
    let style = config.style;
    let box_frame = annotation.frame;
    frame.rects.push(
        RectPrimitive::new(
            dx + box_frame.x,
            dy + box_frame.y,
            box_frame.width,
            box_frame.height,
            background,
        )
        .with_corner_radius(style.annotation_corner_radius_px),
    );
    let h_align = match annotation.anchor {
        LabelAnchor::Middle => TextHAlign::Center,
        LabelAnchor::End => TextHAlign::Right,
    };
    frame.texts.push(TextPrimitive::new(
        annotation.text.clone(),
        dx + annotation.x,
        dy + annotation.y,
        style.font_size_px,
        text_color,
        h_align,
    ));
}
