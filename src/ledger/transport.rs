//! gRPC transport to consensus and mirror nodes.
//!
//! # Responsibilities
//! - Map each API method to its gRPC path
//! - Maintain one lazily-connected channel per node endpoint
//! - Stream topic messages from the mirror node
//!
//! The [`Transport`] trait is the seam between request logic and the wire;
//! tests drive the client through an in-process implementation.

use std::future::Future;
use std::time::Duration;

use dashmap::DashMap;
use futures_util::stream::{BoxStream, StreamExt};
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

use crate::ledger::network::{MirrorEndpoint, NodeAddress};
use crate::ledger::proto;
use crate::ledger::types::{LedgerError, LedgerResult};

/// Consensus node RPCs used by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    CreateAccount,
    CreateTopic,
    SubmitMessage,
    CreateToken,
    MintToken,
    CreateContract,
    ContractCall,
    ContractCallLocal,
    CreateFile,
    AppendFile,
    DeleteFile,
    GetReceipt,
}

impl ApiMethod {
    /// Full gRPC path, `/proto.<Service>/<method>`.
    pub fn path(&self) -> &'static str {
        match self {
            ApiMethod::CreateAccount => "/proto.CryptoService/createAccount",
            ApiMethod::GetReceipt => "/proto.CryptoService/getTransactionReceipts",
            ApiMethod::CreateTopic => "/proto.ConsensusService/createTopic",
            ApiMethod::SubmitMessage => "/proto.ConsensusService/submitMessage",
            ApiMethod::CreateToken => "/proto.TokenService/createToken",
            ApiMethod::MintToken => "/proto.TokenService/mintToken",
            ApiMethod::CreateContract => "/proto.SmartContractService/createContract",
            ApiMethod::ContractCall => "/proto.SmartContractService/contractCallMethod",
            ApiMethod::ContractCallLocal => "/proto.SmartContractService/contractCallLocalMethod",
            ApiMethod::CreateFile => "/proto.FileService/createFile",
            ApiMethod::AppendFile => "/proto.FileService/appendContent",
            ApiMethod::DeleteFile => "/proto.FileService/deleteFile",
        }
    }

    /// Short label for logs and metrics.
    pub fn name(&self) -> &'static str {
        self.path().rsplit('/').next().unwrap_or_default()
    }
}

const SUBSCRIBE_TOPIC_PATH: &str = "/com.hedera.mirror.api.proto.ConsensusService/subscribeTopic";

/// Stream of topic messages from a mirror node.
pub type TopicStream = BoxStream<'static, LedgerResult<proto::ConsensusTopicResponse>>;

/// Wire-level operations the client needs.
pub trait Transport: Send + Sync + 'static {
    /// Submit a signed transaction to `node`.
    fn submit(
        &self,
        node: &NodeAddress,
        method: ApiMethod,
        transaction: proto::Transaction,
    ) -> impl Future<Output = LedgerResult<proto::TransactionResponse>> + Send;

    /// Run a query against `node`.
    fn query(
        &self,
        node: &NodeAddress,
        method: ApiMethod,
        query: proto::Query,
    ) -> impl Future<Output = LedgerResult<proto::Response>> + Send;

    /// Open a server-streaming topic subscription on the mirror node.
    fn subscribe_topic(
        &self,
        query: proto::ConsensusTopicQuery,
    ) -> impl Future<Output = LedgerResult<TopicStream>> + Send;
}

/// Transport settings.
#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

/// Production transport over tonic channels.
pub struct GrpcTransport {
    channels: DashMap<String, Channel>,
    mirror: Channel,
    settings: TransportSettings,
}

/// Pick the process-wide rustls provider before any TLS endpoint is built.
/// More than one provider is compiled in, so rustls cannot choose on its own.
fn install_crypto_provider() {
    // Err means a provider is already installed.
    let _ = rustls::crypto::ring::default_provider().install_default();
}

impl GrpcTransport {
    pub fn new(mirror: &MirrorEndpoint, settings: TransportSettings) -> LedgerResult<Self> {
        install_crypto_provider();
        let mirror_channel = if mirror.tls {
            let host = mirror
                .endpoint
                .split(':')
                .next()
                .unwrap_or(&mirror.endpoint)
                .to_string();
            Endpoint::from_shared(format!("https://{}", mirror.endpoint))?
                .tls_config(
                    ClientTlsConfig::new()
                        .domain_name(host)
                        .with_webpki_roots(),
                )?
                .connect_timeout(settings.connect_timeout)
                .connect_lazy()
        } else {
            Endpoint::from_shared(format!("http://{}", mirror.endpoint))?
                .connect_timeout(settings.connect_timeout)
                .connect_lazy()
        };

        tracing::debug!(mirror = %mirror.endpoint, tls = mirror.tls, "Mirror channel configured");

        Ok(Self {
            channels: DashMap::new(),
            mirror: mirror_channel,
            settings,
        })
    }

    /// Channel for `node`, created on first use.
    fn channel(&self, node: &NodeAddress) -> LedgerResult<Channel> {
        if let Some(channel) = self.channels.get(&node.endpoint) {
            return Ok(channel.clone());
        }

        let channel = Endpoint::from_shared(format!("http://{}", node.endpoint))?
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .connect_lazy();
        self.channels
            .insert(node.endpoint.clone(), channel.clone());
        tracing::debug!(node = %node.account_id, endpoint = %node.endpoint, "Node channel created");
        Ok(channel)
    }
}

async fn unary<Req, Resp>(channel: Channel, path: &'static str, request: Req) -> LedgerResult<Resp>
where
    Req: prost::Message + Send + Sync + 'static,
    Resp: prost::Message + Default + Send + Sync + 'static,
{
    let mut grpc = tonic::client::Grpc::new(channel);
    grpc.ready().await?;
    let codec: ProstCodec<Req, Resp> = ProstCodec::default();
    let response = grpc
        .unary(
            tonic::Request::new(request),
            PathAndQuery::from_static(path),
            codec,
        )
        .await?;
    Ok(response.into_inner())
}

impl Transport for GrpcTransport {
    async fn submit(
        &self,
        node: &NodeAddress,
        method: ApiMethod,
        transaction: proto::Transaction,
    ) -> LedgerResult<proto::TransactionResponse> {
        let channel = self.channel(node)?;
        unary(channel, method.path(), transaction).await
    }

    async fn query(
        &self,
        node: &NodeAddress,
        method: ApiMethod,
        query: proto::Query,
    ) -> LedgerResult<proto::Response> {
        let channel = self.channel(node)?;
        unary(channel, method.path(), query).await
    }

    async fn subscribe_topic(&self, query: proto::ConsensusTopicQuery) -> LedgerResult<TopicStream> {
        let mut grpc = tonic::client::Grpc::new(self.mirror.clone());
        grpc.ready().await?;
        let codec: ProstCodec<proto::ConsensusTopicQuery, proto::ConsensusTopicResponse> =
            ProstCodec::default();
        let response = grpc
            .server_streaming(
                tonic::Request::new(query),
                PathAndQuery::from_static(SUBSCRIBE_TOPIC_PATH),
                codec,
            )
            .await?;
        Ok(response
            .into_inner()
            .map(|item| item.map_err(LedgerError::from))
            .boxed())
    }
}
