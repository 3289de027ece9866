//! v2 application actions

use skiff_domain::{Application, Filter, FilterType, ResourceKind, Result, Warned, Warnings};
use tracing::{info, instrument};

use super::{lookup, Actor};

impl Actor {
    #[instrument(skip(self))]
    pub async fn get_application_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Warned<Application> {
        lookup::find_by_name(
            ResourceKind::Application,
            name,
            |name| {
                vec![
                    Filter::equal(FilterType::Name, name),
                    Filter::equal(FilterType::SpaceGuid, space_guid),
                ]
            },
            |filters| async move { self.v2.get_applications(&filters).await },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn restage_application(&self, name: &str, space_guid: &str) -> Warned<Application> {
        let mut warnings = Warnings::new();
        let result = self.restage_application_steps(name, space_guid, &mut warnings).await;
        Warned::new(result, warnings)
    }

    async fn restage_application_steps(
        &self,
        name: &str,
        space_guid: &str,
        warnings: &mut Warnings,
    ) -> Result<Application> {
        let app = warnings.absorb(self.get_application_by_name_and_space(name, space_guid).await)?;
        let app = warnings.absorb(self.v2.restage_application(&app.guid).await)?;
        info!(app_guid = %app.guid, "application restaged");
        Ok(app)
    }
}
