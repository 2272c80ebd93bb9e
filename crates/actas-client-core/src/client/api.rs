use actas_shared::{
    acta::Acta,
    const_config::path::{PATH_API_ACTAS, PATH_API_ACTA_LOOKUP},
    id::DbId,
    req_args::ActaLookupReqArgs,
};
use futures::channel::oneshot;
use reqwest::header::HeaderMap;

use crate::{
    client::{UiCallBack, DUMMY_ARGUMENT},
    Client,
};

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn list_actas<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Vec<Acta>>> {
        self.send_json_request(PATH_API_ACTAS, &DUMMY_ARGUMENT, HeaderMap::new(), ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn get_acta<F: UiCallBack>(
        &self,
        id: DbId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Acta>> {
        let args = ActaLookupReqArgs { id };
        self.send_json_request(PATH_API_ACTA_LOOKUP, &args, HeaderMap::new(), ui_notify)
    }

    /// Ends the session locally. The tokens are simply forgotten, the backend
    /// is not contacted
    #[tracing::instrument]
    pub fn logout(&self) {
        self.session.logout();
    }
}
