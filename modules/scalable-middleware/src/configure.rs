use scalable_common::Config;
use scalable_state::{EntityFamily, InjectFamily, KeyPath};

use crate::loading::LoadingTracker;

/// Mount the built-in slices where the configuration says.
pub fn apply_key_paths(
    config: &Config,
    inject: &InjectFamily,
    entity: &EntityFamily,
    loading: &LoadingTracker,
) {
    let paths = &config.key_paths;
    inject.set_key_path(KeyPath::parse(&paths.inject));
    entity.set_key_path(KeyPath::parse(&paths.entity));
    loading.set_key_path(KeyPath::parse(&paths.loading));
    config.log_summary();
}
