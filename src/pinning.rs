use chrono::{DateTime, Duration, Utc};

use crate::config::PinRule;
use crate::types::Slide;

/// Index of the slide the rule would pin, if any.
///
/// Eligible types are tried strictly in list order. Within a type the most
/// recently published slide is the candidate (first one wins on equal dates);
/// it qualifies only if no older than `max_age_days`.
pub fn pin_candidate(slides: &[Slide], rule: &PinRule, now: DateTime<Utc>) -> Option<usize> {
    if !rule.enabled {
        return None;
    }
    // ages beyond chrono's range saturate instead of panicking
    let max_age = Duration::try_days(rule.max_age_days.max(0)).unwrap_or(Duration::MAX);
    for ty in &rule.sources {
        let mut best: Option<(usize, DateTime<Utc>)> = None;
        for (idx, slide) in slides.iter().enumerate() {
            if slide.slide_type != *ty {
                continue;
            }
            let Some(at) = slide.published_at else { continue };
            if best.map_or(true, |(_, b)| at > b) {
                best = Some((idx, at));
            }
        }
        let Some((idx, _)) = best else { continue };
        match slides[idx].age(now) {
            Some(age) if age <= max_age => return Some(idx),
            _ => tracing::debug!(slide = %slides[idx].id, kind = %ty, "latest candidate too old to pin"),
        }
    }
    None
}

/// Move the qualifying slide to the front; everything else keeps its order.
pub fn apply_pin(mut slides: Vec<Slide>, rule: &PinRule, now: DateTime<Utc>) -> Vec<Slide> {
    match pin_candidate(&slides, rule, now) {
        Some(0) => {}
        Some(idx) => {
            tracing::debug!(slide = %slides[idx].id, from = idx, "pinning slide to front");
            let pinned = slides.remove(idx);
            slides.insert(0, pinned);
        }
        None => tracing::debug!("no slide qualifies for pinning"),
    }
    slides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SlideMeta, SlideType};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 15, 12, 0, 0).unwrap()
    }

    fn slide(id: &str, ty: SlideType, days_ago: Option<i64>) -> Slide {
        Slide {
            id: id.into(),
            slide_type: ty,
            title: id.into(),
            excerpt: String::new(),
            image: None,
            cta: None,
            meta: SlideMeta::None,
            published_at: days_ago.map(|d| now() - Duration::days(d)),
            url: format!("/{id}"),
        }
    }

    fn rule(sources: Vec<SlideType>, max_age_days: i64) -> PinRule {
        PinRule { enabled: true, sources, max_age_days }
    }

    fn ids(slides: &[Slide]) -> Vec<&str> {
        slides.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn disabled_rule_is_identity() {
        let input = vec![slide("a", SlideType::Blog, Some(1)), slide("y", SlideType::Youtube, Some(0))];
        let mut r = rule(vec![SlideType::Youtube], 7);
        r.enabled = false;
        assert_eq!(apply_pin(input.clone(), &r, now()), input);
    }

    #[test]
    fn priority_type_beats_more_recent_lower_priority() {
        let input = vec![
            slide("blog", SlideType::Blog, Some(0)),
            slide("vid", SlideType::Video, Some(1)),
            slide("yt", SlideType::Youtube, Some(2)),
        ];
        let out = apply_pin(input, &rule(vec![SlideType::Youtube, SlideType::Video], 7), now());
        assert_eq!(ids(&out), ["yt", "blog", "vid"]);
    }

    #[test]
    fn stale_priority_type_falls_through_to_next() {
        let input = vec![
            slide("blog", SlideType::Blog, Some(0)),
            slide("vid", SlideType::Video, Some(3)),
            slide("yt", SlideType::Youtube, Some(30)),
        ];
        let out = apply_pin(input, &rule(vec![SlideType::Youtube, SlideType::Video], 7), now());
        assert_eq!(ids(&out), ["vid", "blog", "yt"]);
    }

    #[test]
    fn nothing_within_max_age_leaves_order() {
        let input = vec![slide("blog", SlideType::Blog, Some(0)), slide("yt", SlideType::Youtube, Some(10))];
        let out = apply_pin(input.clone(), &rule(vec![SlideType::Youtube], 7), now());
        assert_eq!(out, input);
    }

    #[test]
    fn most_recent_within_type_and_first_on_ties() {
        let input = vec![
            slide("b", SlideType::Blog, None),
            slide("yt-old", SlideType::Youtube, Some(5)),
            slide("yt-new-1", SlideType::Youtube, Some(1)),
            slide("yt-new-2", SlideType::Youtube, Some(1)),
            slide("yt-undated", SlideType::Youtube, None),
        ];
        let out = apply_pin(input, &rule(vec![SlideType::Youtube], 7), now());
        assert_eq!(ids(&out), ["yt-new-1", "b", "yt-old", "yt-new-2", "yt-undated"]);
    }

    #[test]
    fn exact_boundary_and_zero_max_age() {
        let input = vec![slide("b", SlideType::Blog, None), slide("yt", SlideType::Youtube, Some(7))];
        assert_eq!(pin_candidate(&input, &rule(vec![SlideType::Youtube], 7), now()), Some(1));
        assert_eq!(pin_candidate(&input, &rule(vec![SlideType::Youtube], 6), now()), None);
        let fresh = vec![slide("b", SlideType::Blog, None), slide("yt", SlideType::Youtube, Some(0))];
        assert_eq!(pin_candidate(&fresh, &rule(vec![SlideType::Youtube], 0), now()), Some(1));
    }

    #[test]
    fn huge_max_age_saturates() {
        let input = vec![slide("b", SlideType::Blog, None), slide("yt", SlideType::Youtube, Some(400))];
        let r = rule(vec![SlideType::Youtube], 200_000_000_000_000);
        assert_eq!(ids(&apply_pin(input, &r, now())), ["yt", "b"]);
        let r = rule(vec![SlideType::Youtube], i64::MAX);
        assert_eq!(pin_candidate(&[slide("yt", SlideType::Youtube, Some(1))], &r, now()), Some(0));
    }

    #[test]
    fn empty_sequence_is_fine() {
        assert!(apply_pin(Vec::new(), &PinRule::default(), now()).is_empty());
    }
}
