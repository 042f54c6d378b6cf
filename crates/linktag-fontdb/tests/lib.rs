// this_file: crates/linktag-fontdb/tests/lib.rs

use linktag_core::{
    fit::fit_text,
    traits::{GlyphProvider, TextMeasure},
};
use linktag_fontdb::{FontHandle, FontResolver, FontSource, SYSTEM_FONT_CANDIDATES};

/// Resolver backed by a real outline font, when the machine has one.
fn system_resolver() -> Option<FontResolver> {
    let resolver = FontResolver::system_default();
    if resolver.is_builtin() {
        eprintln!("no system outline font found; skipping");
        return None;
    }
    Some(resolver)
}

#[test]
fn test_first_loadable_candidate_wins() {
    let Some(system) = system_resolver() else {
        return;
    };
    let first = system.fonts()[0].name().to_string();
    let resolver = FontResolver::new([
        FontSource::path("/nonexistent/first.ttf"),
        FontSource::path(first.clone()),
    ]);
    assert_eq!(resolver.rejected().len(), 1);
    assert_eq!(resolver.rejected()[0], "/nonexistent/first.ttf");
    match resolver.resolve_font(30) {
        FontHandle::Outline { font, size } => {
            assert_eq!(font.name(), first);
            assert_eq!(size, 30);
        },
        other => panic!("expected an outline font, got {other:?}"),
    }
}

#[test]
fn test_outline_measure_scales_with_size() {
    let Some(resolver) = system_resolver() else {
        return;
    };
    let small = resolver.resolve_font(20).measure("2L3.1");
    let large = resolver.resolve_font(40).measure("2L3.1");
    assert!(small.width > 0.0 && small.height > 0.0);
    assert!(large.width > small.width * 1.8);
    assert!(large.height > small.height * 1.8);
}

#[test]
fn test_outline_bounds_are_baseline_relative() {
    let Some(resolver) = system_resolver() else {
        return;
    };
    let outline = resolver.resolve_font(50).outline("H").expect("outline font");
    // Capital H sits on the baseline and rises above it (y-down)
    assert!(outline.bounds.y1.abs() < 1.0);
    assert!(outline.bounds.y0 < -20.0);
}

#[test]
fn test_fit_with_real_font_respects_box() {
    let Some(resolver) = system_resolver() else {
        return;
    };
    let fitted = fit_text(&resolver, "AE12-43", 120, 40, 80, 8);
    assert!(!fitted.overflows);
    assert!(fitted.pixel_size < 80);
    assert!(fitted.extent.fits(120, 40));
    // one pixel larger would not fit
    let bigger = resolver.resolve_font(fitted.pixel_size + 1).measure("AE12-43");
    assert!(!bigger.fits(120, 40));
}

#[test]
fn test_builtin_resolver_never_fails() {
    let resolver = FontResolver::builtin();
    for size in [1, 8, 64, 500] {
        let font = resolver.resolve_font(size);
        assert!(font.is_builtin());
        assert!(font.measure("2L3").width > 0.0);
    }
}

#[test]
fn test_candidate_list_order() {
    assert!(SYSTEM_FONT_CANDIDATES[0].ends_with("DejaVuSans.ttf"));
    assert!(SYSTEM_FONT_CANDIDATES[1].ends_with("DejaVuSans-Bold.ttf"));
    assert_eq!(SYSTEM_FONT_CANDIDATES.last(), Some(&"arial.ttf"));
}
