use crate::model::poll::PollOption;

/// Position-cycled slice colors for non-winning options.
pub const PALETTE: [&str; 6] = [
    "#e91e63", "#c2185b", "#ad1457", "#d81b60", "#f06292", "#ec407a",
];
/// Highlight for the winning option's slice and legend row.
pub const WINNER_COLOR: &str = "rgba(240, 148, 51, 1)";
/// Full-circle placeholder tone when nobody has voted.
pub const EMPTY_COLOR: &str = "#d9d9d9";

#[derive(Debug, Clone, PartialEq)]
pub struct OptionResult {
    pub id: String,
    pub text: String,
    /// Nearest-integer percentage. Rounded independently per option, so
    /// the column may not sum to exactly 100.
    pub pct: u32,
    pub is_winner: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub color: &'static str,
    pub start_deg: f64,
    pub end_deg: f64,
}

/// Radial chart: contiguous clockwise slices from 0° to 360°, one per
/// option in display order, sized by the unrounded vote fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub slices: Vec<Slice>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsSummary {
    pub total_votes: u64,
    pub rows: Vec<OptionResult>,
    pub chart: ChartSpec,
}

/// Pure tally-to-visualization step. Winner is the strict maximum vote
/// count, first option in display order on a tie. A zero-vote poll gets
/// a single neutral full-circle slice and no winner.
pub fn compute(options: &[PollOption]) -> ResultsSummary {
    let total_votes: u64 = options.iter().map(|o| o.vote_count).sum();

    if total_votes == 0 {
        let rows = options
            .iter()
            .map(|o| OptionResult {
                id: o.id.clone(),
                text: o.option_text.clone(),
                pct: 0,
                is_winner: false,
            })
            .collect();
        return ResultsSummary {
            total_votes: 0,
            rows,
            chart: ChartSpec {
                slices: vec![Slice {
                    color: EMPTY_COLOR,
                    start_deg: 0.0,
                    end_deg: 360.0,
                }],
            },
        };
    }

    let max_votes = options.iter().map(|o| o.vote_count).max().unwrap_or(0);
    let winner_idx = options.iter().position(|o| o.vote_count == max_votes);

    let mut rows = Vec::with_capacity(options.len());
    let mut slices = Vec::with_capacity(options.len());
    let mut start = 0.0_f64;
    for (idx, opt) in options.iter().enumerate() {
        let fraction = opt.vote_count as f64 / total_votes as f64;
        let is_winner = winner_idx == Some(idx);
        rows.push(OptionResult {
            id: opt.id.clone(),
            text: opt.option_text.clone(),
            pct: (fraction * 100.0).round() as u32,
            is_winner,
        });
        let end = start + fraction * 360.0;
        slices.push(Slice {
            color: if is_winner {
                WINNER_COLOR
            } else {
                PALETTE[idx % PALETTE.len()]
            },
            start_deg: start,
            end_deg: end,
        });
        start = end;
    }

    ResultsSummary {
        total_votes,
        rows,
        chart: ChartSpec { slices },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(counts: &[u64]) -> Vec<PollOption> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &vote_count)| PollOption {
                id: format!("opt{i}"),
                option_text: format!("Option {i}"),
                vote_count,
            })
            .collect()
    }

    #[test]
    fn exact_percentages_and_winner() {
        let summary = compute(&options(&[30, 20, 50]));
        assert_eq!(summary.total_votes, 100);
        let pcts: Vec<u32> = summary.rows.iter().map(|r| r.pct).collect();
        assert_eq!(pcts, vec![30, 20, 50]);
        assert!(summary.rows[2].is_winner);
        assert_eq!(summary.rows.iter().filter(|r| r.is_winner).count(), 1);
    }

    #[test]
    fn independent_rounding_may_not_sum_to_100() {
        let summary = compute(&options(&[1, 1, 1]));
        for row in &summary.rows {
            assert_eq!(row.pct, 33);
        }
        let sum: u32 = summary.rows.iter().map(|r| r.pct).sum();
        assert_eq!(sum, 99); // not normalized to 100
    }

    #[test]
    fn tie_goes_to_the_first_option_in_display_order() {
        let summary = compute(&options(&[10, 10]));
        assert!(summary.rows[0].is_winner);
        assert!(!summary.rows[1].is_winner);
    }

    #[test]
    fn zero_votes_renders_the_neutral_placeholder() {
        let summary = compute(&options(&[0, 0]));
        assert_eq!(summary.total_votes, 0);
        assert!(summary.rows.iter().all(|r| !r.is_winner));
        assert!(summary.rows.iter().all(|r| r.pct == 0));
        assert_eq!(
            summary.chart.slices,
            vec![Slice {
                color: EMPTY_COLOR,
                start_deg: 0.0,
                end_deg: 360.0,
            }]
        );
    }

    #[test]
    fn slices_are_contiguous_and_proportional() {
        let summary = compute(&options(&[1, 3]));
        let slices = &summary.chart.slices;
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].start_deg, 0.0);
        assert!((slices[0].end_deg - 90.0).abs() < 1e-9);
        assert_eq!(slices[0].end_deg, slices[1].start_deg);
        assert!((slices[1].end_deg - 360.0).abs() < 1e-9);
    }

    #[test]
    fn winner_slice_uses_the_highlight_color() {
        let summary = compute(&options(&[5, 1]));
        assert_eq!(summary.chart.slices[0].color, WINNER_COLOR);
        assert_eq!(summary.chart.slices[1].color, PALETTE[1]);
    }

    #[test]
    fn palette_cycles_past_its_length() {
        let summary = compute(&options(&[9, 1, 1, 1, 1, 1, 1, 1]));
        // option 6 wraps to palette slot 0, option 7 to slot 1
        assert_eq!(summary.chart.slices[6].color, PALETTE[0]);
        assert_eq!(summary.chart.slices[7].color, PALETTE[1]);
    }

    #[test]
    fn recomputation_is_identical() {
        let opts = options(&[4, 7, 2]);
        assert_eq!(compute(&opts), compute(&opts));
    }
}
