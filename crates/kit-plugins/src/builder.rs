use crate::{Client, ClientError, ClientResult};
use kit_plugin_airdrop::Airdrop;
use kit_plugin_instruction_plan::{
    default_transaction_planner_and_executor_from_litesvm,
    default_transaction_planner_and_executor_from_rpc, InstructionPlanConfig,
    TransactionPlannerAndExecutor,
};
use kit_plugin_litesvm::{LitesvmConfig, LitesvmTransport};
use kit_plugin_rpc::{RpcConfig, SharedRpcTransport, SolanaRpc};
use solana_sdk::signature::Keypair;
use std::{fmt, sync::Arc};
use tracing::debug;

/// The backend a client talks to, chosen once when the client is composed
#[derive(Clone)]
pub enum Transport {
    /// A cluster reached over JSON-RPC and websocket subscriptions
    Rpc(SharedRpcTransport),
    /// An in-process LiteSVM
    Litesvm(LitesvmTransport),
}

impl Transport {
    pub fn rpc(url: impl Into<String>) -> ClientResult<Self> {
        Ok(Transport::Rpc(kit_plugin_rpc::rpc(url)?))
    }

    pub fn localhost_rpc() -> Self {
        Transport::Rpc(kit_plugin_rpc::localhost_rpc())
    }

    pub fn from_rpc_config(config: RpcConfig) -> Self {
        Transport::Rpc(Arc::new(SolanaRpc::new(config)))
    }

    pub fn litesvm() -> Self {
        Transport::Litesvm(LitesvmTransport::new())
    }

    pub fn from_litesvm_config(config: &LitesvmConfig) -> Self {
        Transport::Litesvm(LitesvmTransport::with_config(config))
    }

    /// RPC view of the transport; LiteSVM answers the RPC subset itself
    pub fn as_rpc(&self) -> SharedRpcTransport {
        match self {
            Transport::Rpc(rpc) => rpc.clone(),
            Transport::Litesvm(svm) => Arc::new(svm.clone()),
        }
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Rpc(_) => f.write_str("Transport::Rpc"),
            Transport::Litesvm(svm) => f.debug_tuple("Transport::Litesvm").field(svm).finish(),
        }
    }
}

/// Consuming builder installing one capability per step.
///
/// Steps are order-sensitive: generating a payer needs the airdrop capability,
/// and the planner/executor needs a payer.
///
/// ```rust
/// use kit_plugins::{ClientBuilder, Transport, DEFAULT_PAYER_LAMPORTS};
///
/// # async fn example() -> kit_plugins::ClientResult<()> {
/// let client = ClientBuilder::new(Transport::litesvm())
///     .with_airdrop()
///     .with_generated_payer_with_sol(DEFAULT_PAYER_LAMPORTS)
///     .await?
///     .with_default_transaction_planner_and_executor()?
///     .build();
/// assert!(client.svm().is_some());
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    transport: Transport,
    airdrop: Option<Airdrop>,
    payer: Option<Arc<Keypair>>,
    planner_and_executor: Option<TransactionPlannerAndExecutor>,
    instruction_plan_config: InstructionPlanConfig,
}

impl ClientBuilder {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            airdrop: None,
            payer: None,
            planner_and_executor: None,
            instruction_plan_config: InstructionPlanConfig::default(),
        }
    }

    /// Configuration used by the planner/executor installed later on
    pub fn with_instruction_plan_config(self, instruction_plan_config: InstructionPlanConfig) -> Self {
        Self {
            instruction_plan_config,
            ..self
        }
    }

    /// Install the airdrop capability matching the transport
    pub fn with_airdrop(self) -> Self {
        let airdrop = match &self.transport {
            Transport::Litesvm(svm) => Airdrop::from_litesvm(svm.clone()),
            Transport::Rpc(rpc) => Airdrop::from_rpc(rpc.clone()),
        };
        debug!("Installed {:?}", airdrop);
        Self {
            airdrop: Some(airdrop),
            ..self
        }
    }

    /// Install `payer`. An already installed planner/executor is rebuilt to pay with it.
    pub fn with_payer(self, payer: Keypair) -> Self {
        let payer = Arc::new(payer);
        let planner_and_executor = match self.planner_and_executor {
            Some(_) => {
                debug!("Reinstalling transaction planner and executor for the new payer");
                planner_and_executor_for(
                    &self.transport,
                    payer.clone(),
                    self.instruction_plan_config.clone(),
                )
                .ok()
            }
            None => None,
        };
        Self {
            payer: Some(payer),
            planner_and_executor,
            ..self
        }
    }

    /// Install a freshly generated payer funded with `lamports` through the airdrop capability
    pub async fn with_generated_payer_with_sol(self, lamports: u64) -> ClientResult<Self> {
        let airdrop = self.airdrop.as_ref().ok_or(ClientError::MissingCapability {
            capability: "airdrop",
            required_by: "generated payer",
        })?;
        let payer = crate::generated_payer_with_sol(airdrop, lamports).await?;
        Ok(self.with_payer(payer))
    }

    /// Install `payer` when given, otherwise a generated payer funded with `lamports`
    pub async fn with_payer_or_generated_payer(
        self,
        payer: Option<Keypair>,
        lamports: u64,
    ) -> ClientResult<Self> {
        match payer {
            Some(payer) => Ok(self.with_payer(payer)),
            None => self.with_generated_payer_with_sol(lamports).await,
        }
    }

    /// Install the planner/executor matching the transport, paying with the installed payer
    pub fn with_default_transaction_planner_and_executor(self) -> ClientResult<Self> {
        let payer = self.payer.clone().ok_or(ClientError::MissingCapability {
            capability: "payer",
            required_by: "transaction planner and executor",
        })?;
        let planner_and_executor =
            planner_and_executor_for(&self.transport, payer, self.instruction_plan_config.clone())?;

        Ok(Self {
            planner_and_executor: Some(planner_and_executor),
            ..self
        })
    }

    pub fn build(self) -> Client {
        Client::new(
            self.transport,
            self.airdrop,
            self.payer,
            self.planner_and_executor,
        )
    }
}

fn planner_and_executor_for(
    transport: &Transport,
    payer: Arc<Keypair>,
    config: InstructionPlanConfig,
) -> ClientResult<TransactionPlannerAndExecutor> {
    let planner_and_executor = match transport {
        Transport::Rpc(rpc) => {
            default_transaction_planner_and_executor_from_rpc(rpc.clone(), payer, config)?
        }
        Transport::Litesvm(svm) => {
            default_transaction_planner_and_executor_from_litesvm(svm.clone(), payer, config)?
        }
    };
    Ok(planner_and_executor)
}
