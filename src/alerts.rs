use crate::config::AssetConfig;
use crate::fetch::PriceSnapshot;

/// Compare the latest prices against configured thresholds.
///
/// Output order follows config order. Upper and lower checks are
/// independent, so inverted thresholds can fire both lines in one run.
/// Thresholds re-fire on every run they remain true; there is no
/// cross-run state or debounce.
pub fn check_alerts(snapshot: &PriceSnapshot, assets: &[AssetConfig]) -> Vec<String> {
    let mut alerts = Vec::new();

    for asset in assets {
        let Some(price) = snapshot.get(&asset.name) else {
            continue;
        };

        if let Some(upper) = asset.upper {
            if price >= upper {
                alerts.push(format!(
                    "ALERT: {} >= {} -> {:.2} USD",
                    asset.name, upper, price
                ));
            }
        }
        if let Some(lower) = asset.lower {
            if price <= lower {
                alerts.push(format!(
                    "ALERT: {} <= {} -> {:.2} USD",
                    asset.name, lower, price
                ));
            }
        }
    }

    alerts
}
