//! Session controller: owns the lookup lifecycle.
//!
//! One submit runs `Idle → Loading → {Success, Error}` and always hands the
//! input surface back before returning, whatever the outcome. The controller
//! borrows itself exclusively across the fetch await, so a second lookup
//! cannot start while one is in flight and a stale response can never
//! overwrite a newer render.

use tracing::{debug, warn};

use crate::{
    error::SearchError,
    forecast::reduce_daily,
    history::RecentSearches,
    model::CityQuery,
    provider::WeatherFetcher,
    render::{RenderPayload, RenderSink},
    store::KeyValueStore,
};

/// Lifecycle state of the most recent submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loading,
    Success,
    Error,
}

pub struct SessionController<F, R, S>
where
    F: WeatherFetcher,
    R: RenderSink,
    S: KeyValueStore,
{
    fetcher: F,
    sink: R,
    recent: RecentSearches<S>,
    state: SessionState,
}

impl<F, R, S> SessionController<F, R, S>
where
    F: WeatherFetcher,
    R: RenderSink,
    S: KeyValueStore,
{
    pub fn new(fetcher: F, sink: R, recent: RecentSearches<S>) -> Self {
        Self {
            fetcher,
            sink,
            recent,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn recent_entries(&self) -> &[String] {
        self.recent.entries()
    }

    /// Entry point on startup: re-render the persisted recency list, then
    /// either look up the remembered last city or greet a first-time user.
    pub async fn startup(&mut self) {
        self.emit(RenderPayload::RecentList {
            names: self.recent.entries().to_vec(),
        });

        match self.recent.last_city() {
            Some(city) => {
                debug!(%city, "restoring last session city");
                // Failures surface through the sink like any other lookup.
                let _ = self.submit(&city).await;
            }
            None => {
                self.state = SessionState::Idle;
                self.emit(RenderPayload::Welcome);
            }
        }
    }

    /// Validate `raw` and run one lookup.
    ///
    /// Local validation failures never touch the network; remote failures
    /// are rendered with their user-facing message. In every branch the
    /// input surface is re-enabled before this returns, even when the sink
    /// errors mid-render.
    pub async fn submit(&mut self, raw: &str) -> Result<(), SearchError> {
        let query = match CityQuery::parse(raw) {
            Ok(query) => query,
            Err(err) => {
                self.state = SessionState::Error;
                self.emit(RenderPayload::Failure {
                    message: err.user_message().to_string(),
                });
                return Err(err);
            }
        };

        self.state = SessionState::Loading;
        self.emit(RenderPayload::Loading {
            city: query.as_str().to_string(),
        });
        self.sink.set_input_enabled(false);

        let outcome = self.lookup(&query).await;

        // Interactive state comes back no matter how the lookup or its
        // rendering went.
        self.sink.set_input_enabled(true);

        match outcome {
            Ok(()) => {
                self.state = SessionState::Success;
                Ok(())
            }
            Err(err) => {
                self.state = SessionState::Error;
                self.emit(RenderPayload::Failure {
                    message: err.user_message().to_string(),
                });
                Err(err)
            }
        }
    }

    /// A search triggered from the recency list is an ordinary submit.
    pub async fn submit_recent(&mut self, index: usize) -> Result<(), SearchError> {
        match self.recent.entries().get(index) {
            Some(name) => {
                let name = name.clone();
                self.submit(&name).await
            }
            None => Err(SearchError::EmptyInput),
        }
    }

    /// Unconditionally drop the search history; the caller confirms first.
    pub fn clear_history(&mut self) {
        self.recent.clear();
        self.emit(RenderPayload::RecentList { names: Vec::new() });
    }

    async fn lookup(&mut self, query: &CityQuery) -> Result<(), SearchError> {
        let bundle = self.fetcher.fetch(query).await?;

        let days = reduce_daily(&bundle.series);
        let names = self.recent.record(query.as_str()).to_vec();
        if let Some(canonical) = names.first() {
            self.recent.set_last_city(canonical);
        }

        self.emit(RenderPayload::RecentList { names });
        self.emit(RenderPayload::Success {
            current: bundle.current,
            days,
        });

        Ok(())
    }

    fn emit(&mut self, payload: RenderPayload) {
        if let Err(err) = self.sink.render(payload) {
            warn!(%err, "render sink failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::model::{CurrentConditions, ForecastPoint, WeatherBundle};
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Copy)]
    enum Script {
        Succeed,
        NotFound,
        Unauthorized,
        Unreachable,
    }

    #[derive(Debug)]
    struct ScriptedFetcher {
        script: Script,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedFetcher {
        fn new(script: Script) -> (Self, Arc<Mutex<Vec<String>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            (Self { script, calls: calls.clone() }, calls)
        }

        fn bundle() -> WeatherBundle {
            WeatherBundle {
                current: CurrentConditions {
                    location_name: "London".into(),
                    temperature_c: 17.3,
                    description: "light rain".into(),
                    icon_id: "10d".into(),
                },
                series: vec![ForecastPoint {
                    timestamp_unix: 1_788_177_600,
                    timestamp_text: "2026-08-31 12:00:00".into(),
                    temperature_c: 19.6,
                    description: "few clouds".into(),
                    icon_id: "02d".into(),
                }],
            }
        }
    }

    #[async_trait]
    impl WeatherFetcher for ScriptedFetcher {
        async fn fetch(&self, city: &CityQuery) -> Result<WeatherBundle, FetchError> {
            self.calls.lock().unwrap().push(city.as_str().to_string());
            match self.script {
                Script::Succeed => Ok(Self::bundle()),
                Script::NotFound => Err(FetchError::NotFound),
                Script::Unauthorized => Err(FetchError::Unauthorized),
                Script::Unreachable => Err(FetchError::Unreachable(anyhow::anyhow!("timeout"))),
            }
        }
    }

    /// Sink that records payload kinds and affordance toggles, optionally
    /// failing every render call.
    #[derive(Debug, Default)]
    struct RecordingSink {
        events: Vec<String>,
        input_enabled: bool,
        fail_renders: bool,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self { input_enabled: true, ..Self::default() }
        }

        fn failing() -> Self {
            Self { input_enabled: true, fail_renders: true, ..Self::default() }
        }
    }

    impl RenderSink for &mut RecordingSink {
        fn render(&mut self, payload: RenderPayload) -> anyhow::Result<()> {
            let kind = match payload {
                RenderPayload::Welcome => "welcome".to_string(),
                RenderPayload::Loading { .. } => "loading".to_string(),
                RenderPayload::Success { ref days, .. } => format!("success({})", days.len()),
                RenderPayload::Failure { message } => format!("failure({message})"),
                RenderPayload::RecentList { ref names } => format!("recent({})", names.len()),
            };
            self.events.push(kind);

            if self.fail_renders {
                anyhow::bail!("sink tore down");
            }
            Ok(())
        }

        fn set_input_enabled(&mut self, enabled: bool) {
            self.input_enabled = enabled;
            self.events.push(format!("input({enabled})"));
        }
    }

    fn controller<'a>(
        script: Script,
        sink: &'a mut RecordingSink,
    ) -> (
        SessionController<ScriptedFetcher, &'a mut RecordingSink, MemoryStore>,
        Arc<Mutex<Vec<String>>>,
    ) {
        let (fetcher, calls) = ScriptedFetcher::new(script);
        let recent = RecentSearches::load(MemoryStore::new());
        (SessionController::new(fetcher, sink, recent), calls)
    }

    #[tokio::test]
    async fn empty_input_never_reaches_the_fetcher() {
        let mut sink = RecordingSink::new();
        let (mut session, calls) = controller(Script::Succeed, &mut sink);

        for raw in ["", "   ", "\t\n"] {
            let err = session.submit(raw).await.unwrap_err();
            assert!(matches!(err, SearchError::EmptyInput));
        }

        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(session.state(), SessionState::Error);
    }

    #[tokio::test]
    async fn single_character_input_never_reaches_the_fetcher() {
        let mut sink = RecordingSink::new();
        let (mut session, calls) = controller(Script::Succeed, &mut sink);

        let err = session.submit(" L ").await.unwrap_err();
        assert!(matches!(err, SearchError::TooShort));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn successful_submit_records_city_and_renders_success() {
        let mut sink = RecordingSink::new();
        let (mut session, calls) = controller(Script::Succeed, &mut sink);

        session.submit("london").await.expect("lookup succeeds");

        assert_eq!(session.state(), SessionState::Success);
        assert_eq!(calls.lock().unwrap().as_slice(), ["london"]);
        assert_eq!(session.recent_entries(), ["London"]);
        assert_eq!(
            sink.events,
            [
                "loading",
                "input(false)",
                "recent(1)",
                "success(1)",
                "input(true)"
            ]
        );
        assert!(sink.input_enabled);
    }

    #[tokio::test]
    async fn failed_submit_renders_kind_specific_message() {
        for (script, expected) in [
            (Script::NotFound, "City not found. Please check the spelling."),
            (Script::Unauthorized, "Invalid API key. Please check your credentials."),
            (Script::Unreachable, "Something went wrong. Please try again."),
        ] {
            let mut sink = RecordingSink::new();
            let (mut session, _) = controller(script, &mut sink);

            session.submit("London").await.unwrap_err();

            assert_eq!(session.state(), SessionState::Error);
            assert!(session.recent_entries().is_empty());
            assert_eq!(*sink.events.last().unwrap(), format!("failure({expected})"));
            assert!(sink.input_enabled);
        }
    }

    #[tokio::test]
    async fn input_is_reenabled_even_when_rendering_fails() {
        for script in [Script::Succeed, Script::NotFound] {
            let mut sink = RecordingSink::failing();
            let (mut session, _) = controller(script, &mut sink);

            let _ = session.submit("London").await;

            assert!(sink.input_enabled, "input must come back after {script:?}");
            assert!(sink.events.iter().any(|e| e == "input(true)"));
        }
    }

    #[tokio::test]
    async fn startup_without_last_city_renders_welcome() {
        let mut sink = RecordingSink::new();
        let (mut session, calls) = controller(Script::Succeed, &mut sink);

        session.startup().await;

        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(sink.events, ["recent(0)", "welcome"]);
    }

    #[tokio::test]
    async fn startup_with_last_city_performs_lookup() {
        let mut store = MemoryStore::new();
        {
            let mut recent = RecentSearches::load(&mut store);
            recent.record("paris");
            recent.set_last_city("Paris");
        }

        let (fetcher, calls) = ScriptedFetcher::new(Script::Succeed);
        let mut sink = RecordingSink::new();
        let recent = RecentSearches::load(store);
        let mut session = SessionController::new(fetcher, &mut sink, recent);

        session.startup().await;

        assert_eq!(calls.lock().unwrap().as_slice(), ["Paris"]);
        assert_eq!(session.state(), SessionState::Success);
    }

    #[tokio::test]
    async fn recency_selection_is_an_ordinary_submit() {
        let mut sink = RecordingSink::new();
        let (mut session, calls) = controller(Script::Succeed, &mut sink);

        session.submit("oslo").await.expect("first lookup");
        session.submit("lima").await.expect("second lookup");
        // Index 1 is the older entry, "Oslo".
        session.submit_recent(1).await.expect("recency lookup");

        assert_eq!(calls.lock().unwrap().as_slice(), ["oslo", "lima", "Oslo"]);
        assert_eq!(session.recent_entries(), ["Oslo", "Lima"]);
    }

    #[tokio::test]
    async fn clear_history_empties_list_and_rerenders() {
        let mut sink = RecordingSink::new();
        let (mut session, _) = controller(Script::Succeed, &mut sink);

        session.submit("oslo").await.expect("lookup");
        session.clear_history();

        assert!(session.recent_entries().is_empty());
        assert_eq!(*sink.events.last().unwrap(), "recent(0)");
    }
}
