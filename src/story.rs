//! The worked narrative: are men really more lonely? Each panel is one pass
//! through the pipeline: load or transcribe a table, filter it, optionally
//! normalize or bin, reshape to tidy records, render.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::binning::bin_by_width;
use crate::chart::{self, ChartConfig, ChartKind};
use crate::csv_reader;
use crate::datasets::{self, GROUP_COL, TOTAL_COL};
use crate::error;
use crate::normalize::{normalize, GroupedCounts};
use crate::select::{select, Predicate};
use crate::table::{Table, Value};
use crate::tidy::{to_tidy, TidyRecord};
use crate::RenderOptions;

/// One rendered chart with its narrative text.
pub struct Panel {
    pub slug: &'static str,
    pub heading: &'static str,
    pub commentary: &'static str,
    pub png: Vec<u8>,
}

const REPORT_TITLE: &str = "Are men really more lonely?";

const REPORT_INTRO: &str = "A data-driven look at the so-called male loneliness \
epidemic: general happiness trends in the U.S., then gendered differences in \
socializing habits from the General Social Survey. Happiness and life \
satisfaction have declined since 2010 while social support has held up, and \
the survey cross-tabulations show men and women socializing at broadly \
similar rates, with a few pointed differences around bars, best friends and \
close-friend counts.";

/// Build every panel of the narrative. `data_dir` must hold the happiness
/// and life-satisfaction CSV exports; the GSS tables are transcribed
/// in-crate.
pub fn build_story(data_dir: &Path, options: &RenderOptions) -> Result<Vec<Panel>> {
    let mut panels = Vec::new();

    // -- General happiness trends ------------------------------------------

    let happiness = happiness_series(data_dir)?;

    panels.push(line_panel(
        "ladder_score",
        "General happiness has been on the decline since 2010",
        "On average, people in the United States would rate their lives a 6.7 \
         out of 10 as of 2024, down from well above 7 at the start of the \
         decade. The ladder score is the Cantril question: the best possible \
         life for you is a 10, the worst is a 0.",
        &happiness,
        "Ladder score",
        ChartConfig {
            kind: ChartKind::Line,
            title: Some("Change in Ladder Score Over Time".to_string()),
            x_label: Some("Year".to_string()),
            y_label: Some("Ladder Score".to_string()),
        },
        options,
    )?);

    panels.push(line_panel(
        "social_support",
        "Despite the decline in happiness, social support holds up",
        "Social support, having relatives or friends to count on in times of \
         trouble, has not fallen the way the ladder score has. People report \
         support systems, which complicates a simple loneliness reading.",
        &happiness,
        "Social support",
        ChartConfig {
            kind: ChartKind::Line,
            title: Some("Change in Social Support Over Time".to_string()),
            x_label: Some("Year".to_string()),
            y_label: Some("Social Support Score".to_string()),
        },
        options,
    )?);

    let satisfaction = csv_reader::read_path(&data_dir.join("life_satisfaction.csv"), None)
        .context("Failed to load the life-satisfaction export")?;
    panels.push(line_panel(
        "life_satisfaction",
        "Life satisfaction is at an all-time low",
        "The share of Americans 'very satisfied' with their personal lives \
         peaked around 2020 and has dropped steadily since, hitting a record low in \
         the most recent poll. Not being 'very satisfied' is not the same as \
         being deeply unhappy, but the direction is consistent.",
        &satisfaction,
        "Very Satisfied (%)",
        ChartConfig {
            kind: ChartKind::Line,
            title: Some("Change in Personal Life Satisfaction Over the Years".to_string()),
            x_label: Some("Year".to_string()),
            y_label: Some("Percentage of 'Very Satisfied'".to_string()),
        },
        options,
    )?);

    // -- Gendered socializing habits (GSS cross-tabulations) ---------------

    panels.push(percentage_panel(
        "socializing_with_friends",
        "How often do men and women socialize with their friends?",
        "Men are slightly more likely to socialize almost daily or several \
         times a week; women are slightly more likely to socialize monthly. \
         Women are more likely than men to report that they never socialize \
         with friends.",
        datasets::evenings_with_friends()?,
        &datasets::FRIEND_FREQUENCIES,
        ChartConfig {
            kind: ChartKind::GroupedBar,
            title: Some("Socializing with Friends by Gender".to_string()),
            x_label: Some("Frequency of Activity".to_string()),
            y_label: Some("Percentage".to_string()),
        },
        options,
    )?);

    panels.push(percentage_panel(
        "evenings_at_bar",
        "How often do men and women spend time at bars?",
        "Men are significantly more likely to visit bars frequently. More \
         than half of women report never going to bars, against roughly 42% \
         of men: a cultural difference in venue more than in socializing.",
        datasets::evenings_at_bar()?,
        &datasets::FRIEND_FREQUENCIES,
        ChartConfig {
            kind: ChartKind::GroupedBar,
            title: Some("Spending Evenings at a Bar by Gender".to_string()),
            x_label: Some("Frequency of Activity".to_string()),
            y_label: Some("Percentage".to_string()),
        },
        options,
    )?);

    panels.push(percentage_panel(
        "calling_best_friend",
        "How often do people call their best friend?",
        "Women are more likely to call their best friend daily. The middle \
         of the scale is nearly identical between genders, while men are \
         slightly more likely to call only several times a year or less.",
        datasets::calling_best_friend()?,
        &datasets::CONTACT_FREQUENCIES,
        ChartConfig {
            kind: ChartKind::GroupedBar,
            title: Some("Frequency of Calling Best Friend by Gender (Percentage)".to_string()),
            x_label: Some("Frequency of Calling".to_string()),
            y_label: Some("Percentage".to_string()),
        },
        options,
    )?);

    panels.push(count_panel(
        "visiting_best_friend",
        "How often do people visit their best friend?",
        "Visitation patterns are similar: men visit slightly more often at \
         the frequent end, women slightly more at monthly or a few times a \
         year. Similar rates of quality time do not support the notion that \
         men are the lonelier gender.",
        datasets::visiting_best_friend()?,
        &datasets::VISIT_FREQUENCIES,
        ChartConfig {
            kind: ChartKind::GroupedBar,
            title: Some("Frequency of Visiting Best Friend by Gender".to_string()),
            x_label: Some("Frequency of Visiting".to_string()),
            y_label: Some("Count".to_string()),
        },
        options,
    )?);

    panels.push(count_panel(
        "needy_friend",
        "Contributions to a needy friend by gender",
        "Women report helping a friend in need at a slightly higher rate \
         (around 35%) than men (around 29%), though most of both genders \
         said no. The gap is not large enough to carry conclusions.",
        datasets::helping_needy_friend()?,
        &datasets::HELP_RESPONSES,
        ChartConfig {
            kind: ChartKind::GroupedBar,
            title: Some("Contributed to a Needy Friend by Gender".to_string()),
            x_label: Some("Contribution Status".to_string()),
            y_label: Some("Count".to_string()),
        },
        options,
    )?);

    panels.push(close_friends_panel(options)?);

    panels.push(romantic_partner_panel(options)?);

    Ok(panels)
}

/// Write one PNG per panel plus `report.md` into `out_dir`.
pub fn write_story(out_dir: &Path, panels: &[Panel]) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let mut report = String::new();
    report.push_str(&format!("# {}\n\n{}\n", REPORT_TITLE, REPORT_INTRO));

    for panel in panels {
        let file = format!("{}.png", panel.slug);
        fs::write(out_dir.join(&file), &panel.png)
            .with_context(|| format!("Failed to write {}", file))?;
        report.push_str(&format!(
            "\n## {}\n\n![{}]({})\n\n{}\n",
            panel.heading, panel.heading, file, panel.commentary
        ));
    }

    fs::write(out_dir.join("report.md"), report).context("Failed to write report.md")?;
    Ok(())
}

/// U.S. ladder score and social support, 2010-2024, merged from the
/// 2005-2023 panel (ISO-8859-1 export) and the 2024 report.
fn happiness_series(data_dir: &Path) -> Result<Table> {
    let panel = csv_reader::read_path(
        &data_dir.join("happiness_2005_2023.csv"),
        Some("iso-8859-1"),
    )
    .context("Failed to load the 2005-2023 happiness export")?;
    let us = select(&panel, &[Predicate::eq("Country name", "United States")])?
        .rename_column("Life Ladder", "Ladder score")?
        .project(&["year", "Ladder score", "Social support"])?;

    let report = csv_reader::read_path(&data_dir.join("happiness_2024.csv"), None)
        .context("Failed to load the 2024 happiness report")?;
    // The 2024 report has no year column of its own.
    let us_2024 = select(&report, &[Predicate::eq("Country name", "United States")])?
        .with_constant_column("year", Value::Int(2024))?
        .project(&["year", "Ladder score", "Social support"])?;

    let merged = us.append(&us_2024)?;
    Ok(select(&merged, &[Predicate::between("year", 2010.0, 2024.0)])?)
}

fn line_panel(
    slug: &'static str,
    heading: &'static str,
    commentary: &'static str,
    table: &Table,
    value_col: &str,
    config: ChartConfig,
    options: &RenderOptions,
) -> Result<Panel> {
    let x_col = &table.headers()[0];
    let records = to_tidy(table, x_col, &[value_col])?;
    finish_panel(slug, heading, commentary, records, config, options)
}

fn percentage_panel(
    slug: &'static str,
    heading: &'static str,
    commentary: &'static str,
    table: Table,
    categories: &[&str],
    config: ChartConfig,
    options: &RenderOptions,
) -> Result<Panel> {
    let counts = GroupedCounts::new(gender_rows(&table)?, GROUP_COL, categories, TOTAL_COL)?;
    let normalized = normalize(&counts);
    let records = to_tidy(&normalized.table, GROUP_COL, categories)?;
    finish_panel(slug, heading, commentary, records, config, options)
}

fn count_panel(
    slug: &'static str,
    heading: &'static str,
    commentary: &'static str,
    table: Table,
    categories: &[&str],
    config: ChartConfig,
    options: &RenderOptions,
) -> Result<Panel> {
    // Raw counts are charted as-is, but the stated totals are verified first.
    let counts = GroupedCounts::new(gender_rows(&table)?, GROUP_COL, categories, TOTAL_COL)?;
    let records = to_tidy(counts.table(), GROUP_COL, categories)?;
    finish_panel(slug, heading, commentary, records, config, options)
}

fn close_friends_panel(options: &RenderOptions) -> Result<Panel> {
    let table = datasets::close_friends()?;
    let counts = GroupedCounts::new(
        gender_rows(&table)?,
        GROUP_COL,
        &datasets::CLOSE_FRIEND_COUNTS,
        TOTAL_COL,
    )?;
    let binned = bin_by_width(
        counts.table(),
        GROUP_COL,
        &datasets::CLOSE_FRIEND_COUNTS,
        10.0,
        0.0,
        80.0,
    )?;
    let bins: Vec<&str> = binned.headers()[1..].iter().map(String::as_str).collect();
    let records = to_tidy(&binned, GROUP_COL, &bins)?;
    finish_panel(
        "close_friends",
        "Number of close friends by gender",
        "Men are more likely than women to report having no close friends, \
         and women are slightly more likely to report ten or more. Men \
         cluster in the mid-range. This is the one place the data hints that \
         men may run a higher risk of isolation while women keep broader \
         networks.",
        records,
        ChartConfig {
            kind: ChartKind::GroupedBar,
            title: Some("Number of Close Friends by Gender (Grouped by 10s)".to_string()),
            x_label: Some("Number of Close Friends (Grouped)".to_string()),
            y_label: Some("Count".to_string()),
        },
        options,
    )
}

fn romantic_partner_panel(options: &RenderOptions) -> Result<Panel> {
    let table = datasets::romantic_partner()?;
    // Validate the full cross-tabulation, then chart only the YES/NO split;
    // the same-gender-partner column is too sparse to read from a bar.
    let counts = GroupedCounts::new(
        gender_rows(&table)?,
        GROUP_COL,
        &["YES", "NO", "HAS SAME GENDER PARTNER"],
        TOTAL_COL,
    )?;
    let trimmed = counts
        .table()
        .drop_columns(&["HAS SAME GENDER PARTNER", TOTAL_COL])?;
    let records = to_tidy(&trimmed, GROUP_COL, &datasets::PARTNER_RESPONSES)?;
    finish_panel(
        "romantic_partner",
        "Romantic partner status by gender",
        "Men in this sample are slightly more likely than women to report \
         having a romantic partner (48.2% against 40.2%). Again, this is not a \
         difference that supports strong conclusions either way.",
        records,
        ChartConfig {
            kind: ChartKind::GroupedBar,
            title: Some("Romantic Partner Status by Gender".to_string()),
            x_label: Some("Romantic Partner Status".to_string()),
            y_label: Some("Count".to_string()),
        },
        options,
    )
}

fn gender_rows(table: &Table) -> error::Result<Table> {
    select(table, &[Predicate::not_eq(GROUP_COL, "Total")])
}

fn finish_panel(
    slug: &'static str,
    heading: &'static str,
    commentary: &'static str,
    records: Vec<TidyRecord>,
    config: ChartConfig,
    options: &RenderOptions,
) -> Result<Panel> {
    let png = chart::render(&records, &config, options)
        .with_context(|| format!("Failed to render panel '{}'", slug))?;
    Ok(Panel {
        slug,
        heading,
        commentary,
        png,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_rows_drop_the_total_row() {
        let rows = gender_rows(&datasets::evenings_with_friends().unwrap()).unwrap();
        assert_eq!(rows.n_rows(), 2);
    }

    #[test]
    fn test_close_friends_panel_renders() {
        let panel = close_friends_panel(&RenderOptions::default()).unwrap();
        assert_eq!(panel.slug, "close_friends");
        assert!(!panel.png.is_empty());
    }

    #[test]
    fn test_percentage_panel_records_sum_to_100_per_group() {
        let table = datasets::evenings_at_bar().unwrap();
        let counts = GroupedCounts::new(
            gender_rows(&table).unwrap(),
            GROUP_COL,
            &datasets::FRIEND_FREQUENCIES,
            TOTAL_COL,
        )
        .unwrap();
        let normalized = normalize(&counts);
        let records = to_tidy(&normalized.table, GROUP_COL, &datasets::FRIEND_FREQUENCIES).unwrap();

        for group in ["MALE", "FEMALE"] {
            let sum: f64 = records
                .iter()
                .filter(|r| r.group == group)
                .map(|r| r.value)
                .sum();
            assert!((sum - 100.0).abs() < 1e-9);
        }
    }
}
