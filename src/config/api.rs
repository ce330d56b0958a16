pub struct ClientDefaults {
    pub timeout_ms: u64,
}

pub struct ApiConfig {
    pub base_url: &'static str,
    /// Broker tag the chunked endpoint expects on every request
    pub broker: &'static str,
    pub client: ClientDefaults,
}

pub const API: ApiConfig = ApiConfig {
    base_url: "https://beta.forextester.com/data/api/Metadata/bars/chunked",
    broker: "Advanced",
    client: ClientDefaults { timeout_ms: 5000 },
};

pub const SYMBOLS: &[&str] = &["EURUSD", "GBPUSD", "USDJPY", "USDCHF", "AUDUSD"];
