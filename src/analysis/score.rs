//! Point-based SEO score

use crate::analysis::signals::PageSignals;

/// Highest score a page can reach
pub const MAX_SEO_SCORE: u32 = 100;

/// Scores a page from 0 to [`MAX_SEO_SCORE`]
///
/// | Signal | Full points | Partial points |
/// |--------|-------------|----------------|
/// | Title | 20 (30-60 chars) | 10 (any other non-empty) |
/// | Meta description | 20 (120-160 chars) | 10 (any other non-empty) |
/// | H1 | 15 (exactly one) | 8 (several) |
/// | H2 | 10 (two or more) | 5 (one) |
/// | Word count | 10 (300+) | 5 (100+) |
/// | Load time | 15 (≤ 2s) | 10 (≤ 4s), 5 (≤ 6s) |
/// | Viewport meta | 10 | |
pub fn seo_score(signals: &PageSignals) -> u32 {
    let mut score = 0;

    score += length_points(signals.title.as_deref(), 30, 60);
    score += length_points(signals.meta_description.as_deref(), 120, 160);

    score += match signals.h1_tags.len() {
        0 => 0,
        1 => 15,
        _ => 8,
    };
    score += match signals.h2_tags.len() {
        0 => 0,
        1 => 5,
        _ => 10,
    };

    score += match signals.word_count {
        300.. => 10,
        100..=299 => 5,
        _ => 0,
    };

    score += if signals.load_time <= 2.0 {
        15
    } else if signals.load_time <= 4.0 {
        10
    } else if signals.load_time <= 6.0 {
        5
    } else {
        0
    };

    if signals.mobile_friendly {
        score += 10;
    }

    score.min(MAX_SEO_SCORE)
}

fn length_points(text: Option<&str>, min: usize, max: usize) -> u32 {
    let length = text.map_or(0, |t| t.chars().count());
    if (min..=max).contains(&length) {
        20
    } else if length > 0 {
        10
    } else {
        0
    }
}
