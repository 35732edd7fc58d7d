use chrono::{DateTime, Utc};
use tracing::{info, warn};

use jobbook_core::{Business, BusinessId, TemplateKey, WeekSchedule};

/// Defaults for the owner record the resolver constructs when the store has
/// no business at all.
#[derive(Debug, Clone)]
pub struct OwnerDefaults {
    pub name: String,
    pub currency: String,
    pub tax_rate: f64,
    pub template_key: TemplateKey,
    pub schedule: WeekSchedule,
}

impl Default for OwnerDefaults {
    fn default() -> Self {
        Self {
            name: "My Business".to_string(),
            currency: "USD".to_string(),
            tax_rate: 0.0,
            template_key: TemplateKey::Classic,
            schedule: WeekSchedule::standard_business_hours(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OwnerResolution {
    /// The canonical active owner; later passes remap dangling foreign keys
    /// to this id.
    pub default_owner: BusinessId,
    pub created: bool,
    pub activated: bool,
    pub deactivated: usize,
}

/// Ensure exactly one business is active and return it as the default owner.
///
/// Already-active owners are kept. Historical data may hold several active
/// records at once; the deterministically-first one (by creation order, then
/// id) wins and the rest are cleared. An empty store gets one default owner.
pub fn resolve_active_owner(
    businesses: &mut Vec<Business>,
    defaults: &OwnerDefaults,
    now: DateTime<Utc>,
) -> OwnerResolution {
    let mut order: Vec<usize> = (0..businesses.len()).collect();
    order.sort_by_key(|&i| (businesses[i].created_at, businesses[i].id));

    if let Some(&keep) = order.iter().find(|&&i| businesses[i].active) {
        let mut deactivated = 0;
        for &i in &order {
            if i != keep && businesses[i].active {
                businesses[i].active = false;
                deactivated += 1;
            }
        }
        if deactivated > 0 {
            warn!(
                kept = %businesses[keep].id,
                cleared = deactivated,
                "multiple active businesses found, collapsed to one"
            );
        }
        return OwnerResolution {
            default_owner: businesses[keep].id,
            created: false,
            activated: false,
            deactivated,
        };
    }

    if let Some(&first) = order.first() {
        businesses[first].active = true;
        info!(business = %businesses[first].id, "no active business, activated earliest");
        return OwnerResolution {
            default_owner: businesses[first].id,
            created: false,
            activated: true,
            deactivated: 0,
        };
    }

    let owner = Business {
        id: BusinessId::new(),
        name: defaults.name.clone(),
        active: true,
        currency: defaults.currency.clone(),
        tax_rate: defaults.tax_rate,
        default_template_key: defaults.template_key.as_str().to_string(),
        payment_account_id: None,
        schedule: defaults.schedule.clone(),
        created_at: now,
    };
    let id = owner.id;
    info!(business = %id, "empty store, created default business");
    businesses.push(owner);
    OwnerResolution {
        default_owner: id,
        created: true,
        activated: true,
        deactivated: 0,
    }
}
