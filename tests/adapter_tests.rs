use sitac_app::adapters::inbound::{ChannelEnvelopeSource, FileEnvelopeSource};
use sitac_app::adapters::outbound::HttpSettingsApi;
use sitac_app::application::{run_event_loop, SitacService};
use sitac_app::adapters::outbound::init_noop_notifier;
use sitac_app::common::{Envelope, EnvelopeSource};
use sitac_app::config::AppConfig;
use tempfile::tempdir;

const RECORDING: &str = r#"{"eventType":"INITIAL_LOAD","timestampMs":10,"config":{"centerX":0.0,"centerY":0.0,"maxMobileDistanceFromCenterM":10000.0,"isSimulationRunning":true,"updatePeriodMs":500,"mobiles":2},"mobiles":{"1":{"id":1,"shape":"CIRCLE","color":"BLUE","kinematics":{"xM":100.0,"yM":100.0}},"2":{"id":2,"shape":"SQUARE","color":"VIOLET","kinematics":{"xM":-100.0,"yM":100.0}}}}
{"eventType":"MOBILES_UPDATED","timestampMs":20,"mobiles":{"2":{"kinematics":{"yM":-100.0}}}}
{"eventType":"MOBILES_CREATED","timestampMs":30,"mobiles":{"3":{"id":3,"shape":"DIAMOND","color":"YELLOW","kinematics":{"xM":0.0,"yM":700.0}}}}
"#;

#[tokio::test]
async fn test_replay_file_drives_the_service() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.jsonl");
    std::fs::write(&path, RECORDING).unwrap();

    let mut source = FileEnvelopeSource::open(&path).await.unwrap();
    let mut service = SitacService::new(&AppConfig::default().display, init_noop_notifier());

    let applied = run_event_loop(&mut source, &mut service).await.unwrap();

    assert_eq!(applied, 3);
    assert_eq!(service.store().len(), 3);
    assert_eq!(service.store().get(2).unwrap().kinematics.y_m, -100.0);
    assert_eq!(service.density().frame().total_count(), 3);
}

#[tokio::test]
async fn test_missing_replay_file_is_an_error() {
    let dir = tempdir().unwrap();
    let result = FileEnvelopeSource::open(dir.path().join("absent.jsonl")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_channel_source_preserves_order() {
    let (sender, mut source) = ChannelEnvelopeSource::new(4);
    sender.send(Envelope::new("MOBILES_UPDATED", 1)).await.unwrap();
    sender
        .send(Envelope::new("MOBILES_DELETED", 2).with_mobiles(serde_json::Map::new()))
        .await
        .unwrap();
    drop(sender);

    assert_eq!(source.next_envelope().await.unwrap().unwrap().timestamp_ms, 1);
    assert_eq!(source.next_envelope().await.unwrap().unwrap().timestamp_ms, 2);
    assert!(source.next_envelope().await.unwrap().is_none());
}

#[test]
fn test_settings_endpoints_follow_config() {
    let config = AppConfig::default();
    let api = HttpSettingsApi::new(config.api.clone());
    assert_eq!(
        api.endpoint(&config.api.mobiles_size_path, 40),
        format!("{}/{}/40", config.api.base_url, config.api.mobiles_size_path)
    );
}
