//! Dynamic contract proxies over JSON-RPC
//!
//! A [`ContractHandle`] binds a deployed address to its parsed ABI and the
//! shared RPC client. Calls are encoded through alloy-dyn-abi from the ABI
//! description, so the harness needs no compile-time bindings for the
//! protocol contracts.

use alloy::primitives::{Address, Bytes};
use alloy::rpc::types::{Filter, Log, TransactionInput, TransactionReceipt, TransactionRequest};
use alloy_dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy_json_abi::{Event, Function, JsonAbi};
use eyre::Result;
use tracing::debug;

use crate::error::HarnessError;
use crate::models::TxOptions;
use crate::rpc::EthereumClient;

/// Remote proxy for one deployed contract
#[derive(Clone)]
pub struct ContractHandle {
    client: EthereumClient,
    name: String,
    address: Address,
    abi: JsonAbi,
}

impl ContractHandle {
    /// Bind a proxy to a deployed contract
    pub fn new(client: EthereumClient, name: &str, address: Address, abi: JsonAbi) -> Self {
        Self {
            client,
            name: name.to_string(),
            address,
            abi,
        }
    }

    /// Address this proxy is bound to
    pub fn address(&self) -> Address {
        self.address
    }

    /// Contract name, as registered in the ABI directory
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Execute a read-only method and decode its return values
    pub async fn call(&self, function: &str, args: &[DynSolValue]) -> Result<Vec<DynSolValue>> {
        let descriptor = self.function(function)?;
        let data = encode_call(&self.name, descriptor, args)?;

        let mut tx = TransactionRequest::default();
        tx.to = Some(self.address.into());
        tx.input = TransactionInput::from(Bytes::from(data));

        debug!(contract = %self.name, function, "eth_call");
        let raw = self.client.call(&tx).await?;
        decode_output(&self.name, descriptor, &raw)
    }

    /// Submit a state-changing method and wait until it is mined
    pub async fn send(
        &self,
        function: &str,
        args: &[DynSolValue],
        opts: &TxOptions,
    ) -> Result<TransactionReceipt> {
        let descriptor = self.function(function)?;
        let data = encode_call(&self.name, descriptor, args)?;

        let mut tx = TransactionRequest::default();
        tx.from = Some(opts.from);
        tx.to = Some(self.address.into());
        tx.gas = Some(opts.gas);
        tx.gas_price = opts.gas_price;
        tx.input = TransactionInput::from(Bytes::from(data));

        debug!(contract = %self.name, function, from = %opts.from, "eth_sendTransaction");
        self.client.send(&tx).await
    }

    /// Logs emitted by a named event of this contract since `from_block`
    pub async fn events(&self, event: &str, from_block: u64) -> Result<Vec<Log>> {
        let descriptor = self.event(event)?;
        let filter = Filter::new()
            .address(self.address)
            .event_signature(descriptor.selector())
            .from_block(from_block);
        self.client.logs(&filter).await
    }

    fn function(&self, name: &str) -> Result<&Function> {
        self.abi
            .functions
            .get(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| {
                HarnessError::Abi(format!("{} has no function '{}'", self.name, name)).into()
            })
    }

    fn event(&self, name: &str) -> Result<&Event> {
        self.abi
            .events
            .get(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| {
                HarnessError::Abi(format!("{} has no event '{}'", self.name, name)).into()
            })
    }
}

/// Encode calldata: 4-byte selector followed by ABI-encoded arguments
fn encode_call(contract: &str, function: &Function, args: &[DynSolValue]) -> Result<Vec<u8>> {
    if args.len() != function.inputs.len() {
        return Err(HarnessError::contract(
            contract,
            &function.name,
            format!("expected {} arguments, got {}", function.inputs.len(), args.len()),
        )
        .into());
    }

    function.abi_encode_input(args).map_err(|e| {
        HarnessError::contract(contract, &function.name, format!("encode input: {}", e)).into()
    })
}

/// Decode the return data of a call according to the function's outputs
fn decode_output(contract: &str, function: &Function, data: &[u8]) -> Result<Vec<DynSolValue>> {
    if function.outputs.is_empty() {
        return Ok(Vec::new());
    }

    function.abi_decode_output(data, false).map_err(|e| {
        HarnessError::contract(contract, &function.name, format!("decode output: {}", e)).into()
    })
}
