//! The rendering sink: tidy records in, PNG bytes out. The pipeline never
//! depends on anything in here beyond the `render` signature.

use std::collections::HashMap;

use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::prelude::*;
use plotters::style::FontTransform;
use serde::Deserialize;

use crate::palette::ColorPalette;
use crate::tidy::TidyRecord;
use crate::RenderOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ChartKind {
    /// Categories on the x axis, one dodged bar per group within each.
    #[serde(rename = "bar")]
    GroupedBar,
    /// One series per category; the group value is the numeric x.
    #[serde(rename = "line")]
    Line,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    pub kind: ChartKind,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub x_label: Option<String>,
    #[serde(default)]
    pub y_label: Option<String>,
}

/// Render a tidy record sequence to PNG bytes.
pub fn render(
    records: &[TidyRecord],
    config: &ChartConfig,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    if records.is_empty() {
        anyhow::bail!("cannot render a chart with no records");
    }
    match config.kind {
        ChartKind::GroupedBar => render_grouped_bar(records, config, options),
        ChartKind::Line => render_line(records, config, options),
    }
}

/// Distinct values in first-appearance order, so the tidy sequence's
/// deterministic order carries through to axis and legend order.
fn distinct<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        if !seen.iter().any(|s| s.as_str() == item) {
            seen.push(item.to_string());
        }
    }
    seen
}

fn render_grouped_bar(
    records: &[TidyRecord],
    config: &ChartConfig,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    let categories = distinct(records.iter().map(|r| r.category.as_str()));
    let groups = distinct(records.iter().map(|r| r.group.as_str()));

    let mut values: HashMap<(&str, &str), f64> = HashMap::new();
    for r in records {
        values.insert((r.group.as_str(), r.category.as_str()), r.value);
    }

    let y_max = records.iter().fold(0.0f64, |acc, r| acc.max(r.value));
    let y_range = 0.0..if y_max > 0.0 { y_max * 1.05 } else { 1.0 };
    let x_range = 0.0..categories.len() as f64;

    let mut buffer = vec![0u8; (options.width * options.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(config.title.as_deref().unwrap_or(""), ("sans-serif", 20))
            .x_label_area_size(110)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, y_range)
            .context("Failed to build chart")?;

        let categories_clone = categories.clone();
        chart
            .configure_mesh()
            .x_labels(categories.len())
            .x_label_formatter(&|x| {
                let idx = *x as usize;
                if idx < categories_clone.len() {
                    categories_clone[idx].clone()
                } else {
                    String::new()
                }
            })
            .x_label_style(
                ("sans-serif", 12)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_desc(config.x_label.as_deref().unwrap_or(""))
            .y_desc(config.y_label.as_deref().unwrap_or(""))
            .draw()
            .context("Failed to draw mesh")?;

        let color_map = ColorPalette::category10().assign_colors(&groups);
        let num_groups = groups.len();
        let bar_width = 0.8 / num_groups as f64;

        for (group_idx, group) in groups.iter().enumerate() {
            let color = color_map[group.as_str()];
            let x_offset = (group_idx as f64 - (num_groups as f64 - 1.0) / 2.0) * bar_width;

            let bars: Vec<Rectangle<(f64, f64)>> = categories
                .iter()
                .enumerate()
                .filter_map(|(cat_idx, cat)| {
                    let y = *values.get(&(group.as_str(), cat.as_str()))?;
                    let x_center = cat_idx as f64 + 0.5 + x_offset;
                    Some(Rectangle::new(
                        [
                            (x_center - bar_width / 2.0, 0.0),
                            (x_center + bar_width / 2.0, y),
                        ],
                        color.filled(),
                    ))
                })
                .collect();

            chart
                .draw_series(bars)
                .context("Failed to draw bar series")?
                .label(group.clone())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
        }

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .draw()
            .context("Failed to draw legend")?;

        root.present().context("Failed to present drawing")?;
    }

    encode_png(&buffer, options)
}

fn render_line(
    records: &[TidyRecord],
    config: &ChartConfig,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    let series = distinct(records.iter().map(|r| r.category.as_str()));

    // The group label is the x position for line charts; it must be numeric.
    let mut points: Vec<(f64, f64, &str)> = Vec::with_capacity(records.len());
    for r in records {
        let x: f64 = r.group.parse().with_context(|| {
            format!("line charts need numeric group values, got '{}'", r.group)
        })?;
        points.push((x, r.value, r.category.as_str()));
    }

    let x_min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let x_max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let y_min = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let y_max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let x_range = pad_range(x_min, x_max);
    let y_range = pad_range(y_min, y_max);

    let mut buffer = vec![0u8; (options.width * options.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(config.title.as_deref().unwrap_or(""), ("sans-serif", 20))
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, y_range)
            .context("Failed to build chart")?;

        chart
            .configure_mesh()
            .x_desc(config.x_label.as_deref().unwrap_or(""))
            .y_desc(config.y_label.as_deref().unwrap_or(""))
            .draw()
            .context("Failed to draw mesh")?;

        let color_map = ColorPalette::category10().assign_colors(&series);
        for name in &series {
            let color = color_map[name.as_str()];
            let line: Vec<(f64, f64)> = points
                .iter()
                .filter(|p| p.2 == name)
                .map(|p| (p.0, p.1))
                .collect();

            chart
                .draw_series(LineSeries::new(line.clone(), color.stroke_width(2)))
                .context("Failed to draw line series")?
                .label(name.clone())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 10, y)], color.stroke_width(2))
                });

            chart
                .draw_series(line.iter().map(|&(x, y)| Circle::new((x, y), 3, color.filled())))
                .context("Failed to draw point markers")?;
        }

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .draw()
            .context("Failed to draw legend")?;

        root.present().context("Failed to present drawing")?;
    }

    encode_png(&buffer, options)
}

fn pad_range(min: f64, max: f64) -> std::ops::Range<f64> {
    if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding)..(max + padding)
    }
}

fn encode_png(buffer: &[u8], options: &RenderOptions) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(
                buffer,
                options.width,
                options.height,
                image::ColorType::Rgb8,
            )
            .context("Failed to encode PNG")?;
    }
    Ok(png_bytes)
}
