//! Console tables for the assembled view.

use stanza::style::{HAlign, Header, MinWidth, Styles};
use stanza::table::{Col, Row, Table};

use crate::forecast::{ForecastError, ForecastResult, Method};
use crate::stats::{DerivedGameRecord, Stat};

fn right(width: usize) -> Col {
    Col::new(Styles::default().with(MinWidth(width)).with(HAlign::Right))
}

fn header_row(cells: Vec<&str>) -> Row {
    Row::new(
        Styles::default().with(Header(true)),
        cells.into_iter().map(Into::into).collect(),
    )
}

fn optional(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(value) => format!("{value:.precision$}"),
        None => "-".into(),
    }
}

pub fn tabulate_game_log(games: &[DerivedGameRecord]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(10))),
            Col::new(Styles::default().with(MinWidth(12))),
            right(5),
            right(5),
            right(5),
            right(5),
            right(5),
            right(5),
            right(6),
        ])
        .with_row(header_row(vec![
            "Date", "Matchup", "MIN", "PTS", "REB", "AST", "PRA", "FGA", "FG%",
        ]));
    for game in games {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                game.base.date.to_string().into(),
                game.base.matchup.clone().into(),
                optional(game.base.minutes, 0).into(),
                game.base.points.to_string().into(),
                game.base.rebounds.to_string().into(),
                game.base.assists.to_string().into(),
                game.pra.to_string().into(),
                game.base.fg_attempts.to_string().into(),
                optional(game.base.fg_pct.map(|pct| pct * 100.0), 1).into(),
            ],
        ));
    }
    table
}

pub fn tabulate_means(means: &[(Stat, f64)]) -> Table {
    let mut table = Table::default().with_cols(
        means
            .iter()
            .map(|_| right(7))
            .collect(),
    );
    table.push_row(Row::new(
        Styles::default().with(Header(true)),
        means
            .iter()
            .map(|(stat, _)| stat.to_string().into())
            .collect(),
    ));
    table.push_row(Row::new(
        Styles::default(),
        means
            .iter()
            .map(|(_, mean)| format!("{mean:.1}").into())
            .collect(),
    ));
    table
}

pub fn tabulate_forecasts(
    forecasts: &[ForecastResult],
    withheld: &[(Method, ForecastError)],
) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(20))),
            right(10),
        ])
        .with_row(header_row(vec!["Method", "Estimate"]));
    for forecast in forecasts {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                forecast.method.to_string().into(),
                format!("{:.2}", forecast.estimate).into(),
            ],
        ));
    }
    for (method, _) in withheld {
        table.push_row(Row::new(
            Styles::default(),
            vec![method.to_string().into(), "withheld".into()],
        ));
    }
    table
}

#[cfg(test)]
mod tests {
    use stanza::renderer::console::Console;
    use stanza::renderer::Renderer;

    use super::*;
    use crate::boost;
    use crate::stats::augment;
    use crate::testing::game;

    #[test]
    fn game_log_table_renders_every_game() {
        let mut first = game("2024-01-01", "LAL vs. BOS");
        first.fg_pct = None;
        first.minutes = None;
        let second = game("2024-01-03", "LAL @ DEN");
        let games = augment(&[first, second]);
        let rendered = Console::default()
            .render(&tabulate_game_log(&games))
            .to_string();
        assert!(rendered.contains("LAL vs. BOS"));
        assert!(rendered.contains("LAL @ DEN"));
        assert!(rendered.contains("2024-01-01"));
        assert!(rendered.contains('-'));
    }

    #[test]
    fn forecast_table_marks_withheld_methods() {
        let forecasts = vec![ForecastResult {
            stat: Stat::Pts,
            method: Method::LinearTrend,
            estimate: 27.5,
        }];
        let withheld = vec![(
            Method::GradientBoosted(boost::Config::default()),
            ForecastError::Model(boost::FitError::InsufficientData { rows: 1 }),
        )];
        let rendered = Console::default()
            .render(&tabulate_forecasts(&forecasts, &withheld))
            .to_string();
        assert!(rendered.contains("linear trend"));
        assert!(rendered.contains("27.50"));
        assert!(rendered.contains("withheld"));
    }

    #[test]
    fn means_table_renders_one_value_per_stat() {
        let means = vec![(Stat::Pts, 25.0), (Stat::Reb, 7.5)];
        let rendered = Console::default()
            .render(&tabulate_means(&means))
            .to_string();
        assert!(rendered.contains("PTS"));
        assert!(rendered.contains("25.0"));
        assert!(rendered.contains("7.5"));
    }
}
