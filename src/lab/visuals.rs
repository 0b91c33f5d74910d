//! Vessel appearance derived from a mixture.
//!
//! These are pure functions of the staged reagents and the resolved product.
//! They never influence reaction matching.

use crate::models::{Hsla, Particle, Phase, Product, StagedReagent, VesselVisuals};

/// Color shown when no liquid is staged.
pub const NEUTRAL_COLOR: Hsla = Hsla::new(210.0, 20.0, 50.0, 0.1);

/// Alpha applied to a blend of staged liquids.
pub const BLEND_ALPHA: f64 = 0.6;

pub const FULL_PERCENT: f64 = 100.0;

/// Quantity that corresponds to one percent of fill.
const QUANTITY_PER_PERCENT: f64 = 10.0;

/// Quantity represented by one solid particle.
const QUANTITY_PER_PARTICLE: f64 = 100.0;

/// Quantity-weighted average of the liquids' HSL components.
///
/// A resolved product's color replaces the blend entirely.
pub fn liquid_color(staged: &[StagedReagent], product: Option<&Product>) -> Hsla {
    if let Some(product) = product {
        return product.color;
    }

    let liquids: Vec<_> = staged
        .iter()
        .filter(|s| s.reagent.phase == Phase::Liquid)
        .collect();
    let total: f64 = liquids.iter().map(|s| s.quantity).sum();
    if liquids.is_empty() || total <= 0.0 {
        return NEUTRAL_COLOR;
    }

    let (h, s, l) = liquids.iter().fold((0.0, 0.0, 0.0), |(h, s, l), staged| {
        let weight = staged.quantity / total;
        let color = staged.reagent.color;
        (h + color.h * weight, s + color.s * weight, l + color.l * weight)
    });
    Hsla::new(h, s, l, BLEND_ALPHA)
}

/// Fill level in percent; saturates at 100 and is full once a product exists.
pub fn fill_percent(staged: &[StagedReagent], has_product: bool) -> f64 {
    if staged.is_empty() {
        return 0.0;
    }
    if has_product {
        return FULL_PERCENT;
    }
    let total: f64 = staged.iter().map(|s| s.quantity / QUANTITY_PER_PERCENT).sum();
    total.clamp(0.0, FULL_PERCENT)
}

/// One particle per started block of quantity for each solid; none once a product exists.
pub fn particles(staged: &[StagedReagent], has_product: bool) -> Vec<Particle> {
    if has_product {
        return Vec::new();
    }
    staged
        .iter()
        .filter(|s| s.reagent.phase == Phase::Solid)
        .flat_map(|solid| {
            let count = (solid.quantity / QUANTITY_PER_PARTICLE).ceil().max(0.0) as usize;
            (0..count).map(move |i| Particle {
                id: format!("{}-{}", solid.reagent.id, i),
                color: solid.reagent.color,
            })
        })
        .collect()
}

pub fn derive(staged: &[StagedReagent], product: Option<&Product>) -> VesselVisuals {
    VesselVisuals {
        liquid_color: liquid_color(staged, product),
        fill_percent: fill_percent(staged, product.is_some()),
        particles: particles(staged, product.is_some()),
    }
}
