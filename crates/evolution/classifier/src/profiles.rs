use evolution_types::{BehaviorCluster, LineHeight, PersonalizationProfile};

/// Fixed personalization hints for a cluster.
pub fn personalization_profile(cluster: BehaviorCluster) -> PersonalizationProfile {
    use evolution_types::CtaStrength as Cta;
    use evolution_types::DensityToken as Density;
    use evolution_types::NavigationFocus as Nav;

    let (ui_density, cta_strength, line_height, navigation_focus, feature_highlights) =
        match cluster {
            BehaviorCluster::Explorer => {
                (Density::Comfortable, Cta::Normal, LineHeight::Normal, Nav::Top, true)
            }
            BehaviorCluster::DecisiveBuyer => {
                (Density::Compact, Cta::Strong, LineHeight::Tight, Nav::Top, false)
            }
            BehaviorCluster::SlowReader => {
                (Density::Comfortable, Cta::Subtle, LineHeight::Loose, Nav::Top, false)
            }
            BehaviorCluster::MobileHeavy => {
                (Density::Default, Cta::Strong, LineHeight::Normal, Nav::Bottom, false)
            }
            BehaviorCluster::PowerUser => {
                (Density::Compact, Cta::Normal, LineHeight::Tight, Nav::Sidebar, true)
            }
            BehaviorCluster::PassiveScroller => {
                (Density::Comfortable, Cta::Subtle, LineHeight::Normal, Nav::Top, false)
            }
        };

    PersonalizationProfile {
        ui_density,
        cta_strength,
        line_height,
        navigation_focus,
        feature_highlights,
    }
}
