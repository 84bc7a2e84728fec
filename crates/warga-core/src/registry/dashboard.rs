use super::{Registry, store_error};
use crate::{
  Result,
  dashboard::{DashboardInputs, DashboardStats, RECENT_LIMIT, month_start},
  permission::{Action, Resource},
  role::Actor,
  store::RegistryStore,
  validation::today,
};

impl<S: RegistryStore> Registry<S> {
  /// Run the independent dashboard reads concurrently and fold them.
  pub async fn dashboard(&self, actor: &Actor) -> Result<DashboardStats> {
    self.authorize(actor, Resource::Dashboard, Action::Read).await?;

    let since = month_start(today());
    let store = &self.store;
    let (
      by_status,
      by_sex,
      family_cards,
      regions,
      mutations,
      letters,
      recent_mutations,
      recent_letters,
    ) = futures::try_join!(
      store.count_residents_by_status(),
      store.count_living_by_sex(),
      store.count_family_cards(),
      store.count_regions(),
      store.count_mutations_since(since),
      store.count_letters_since(since),
      store.recent_mutations(RECENT_LIMIT),
      store.recent_letters(RECENT_LIMIT),
    )
    .map_err(store_error)?;

    Ok(DashboardStats::fold(
      DashboardInputs {
        by_status,
        by_sex,
        family_cards,
        regions,
        mutations,
        letters,
        recent_mutations,
        recent_letters,
      },
      since,
    ))
  }
}
