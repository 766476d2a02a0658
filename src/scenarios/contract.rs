//! Contract scenario: deploy the lookup contract, read, write, read again.

use std::path::Path;

use alloy::primitives::{hex, U256};
use alloy::sol;
use alloy::sol_types::SolValue;

use crate::ledger::{
    ContractCallQuery, ContractCreateFlow, ContractExecuteTransaction, ContractId, LedgerError,
    Status, Transport,
};
use crate::scenarios::{report, ScenarioContext, ScenarioError, ScenarioResult};

sol! {
    /// Name to phone number registry.
    interface LookupContract {
        function getMobileNumber(string name) external view returns (uint256);
        function setMobileNumber(string name, uint256 mobileNumber) external;
    }
}

#[derive(Debug, Clone)]
pub struct ContractOutcome {
    pub contract_id: ContractId,
    pub initial_number: U256,
    pub execute_status: Status,
    pub updated_number: U256,
}

/// Read compiled bytecode. Hex text (with or without `0x`) is decoded;
/// anything else is taken as raw bytes.
pub fn load_bytecode(path: &Path) -> ScenarioResult<Vec<u8>> {
    let raw = std::fs::read(path).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let bytecode = match std::str::from_utf8(&raw).ok().and_then(decode_hex_text) {
        Some(decoded) => decoded,
        None => raw,
    };
    if bytecode.is_empty() {
        return Err(ScenarioError::Bytecode(format!("{} is empty", path.display())));
    }
    Ok(bytecode)
}

fn decode_hex_text(text: &str) -> Option<Vec<u8>> {
    let text = text.trim();
    let digits: String = text
        .strip_prefix("0x")
        .unwrap_or(text)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    hex::decode(digits).ok()
}

pub async fn run<T: Transport>(ctx: &ScenarioContext<T>) -> ScenarioResult<ContractOutcome> {
    let client = &ctx.client;
    let settings = &ctx.config.contract;

    report::banner("Deploying and calling a smart contract");

    let bytecode = load_bytecode(Path::new(&settings.bytecode_path))?;
    report::step(&format!(
        "Deploying {} ({} bytes of bytecode)",
        settings.bytecode_path,
        bytecode.len()
    ));
    let constructor =
        (settings.initial_name.clone(), U256::from(settings.initial_number)).abi_encode_params();
    let response = ContractCreateFlow::new()
        .bytecode(bytecode)
        .gas(settings.deploy_gas)
        .constructor_parameters(constructor)
        .execute(client)
        .await?;
    let receipt = response.get_receipt(client).await?;
    let contract_id = receipt
        .contract_id
        .ok_or(LedgerError::MissingField("contract_id"))?;
    report::done(&format!(
        "Contract deployed: {} (EVM address 0x{})",
        contract_id,
        contract_id.to_solidity_address()
    ));
    report::link("contract", &ctx.explorer.contract(contract_id));
    report::link("transaction", &ctx.explorer.transaction(&response.transaction_id));

    let initial_number = lookup(ctx, contract_id, &settings.initial_name).await?;

    report::step(&format!(
        "Calling setMobileNumber(\"{}\", {})",
        settings.update_name, settings.update_number
    ));
    let response = ContractExecuteTransaction::new()
        .contract_id(contract_id)
        .gas(settings.call_gas)
        .function(&LookupContract::setMobileNumberCall {
            name: settings.update_name.clone(),
            mobileNumber: U256::from(settings.update_number),
        })
        .execute(client)
        .await?;
    let receipt = response.get_receipt(client).await?;
    report::done(&format!("Contract executed: {}", receipt.status));
    report::link("transaction", &ctx.explorer.transaction(&response.transaction_id));

    let updated_number = lookup(ctx, contract_id, &settings.update_name).await?;
    report::finale();

    Ok(ContractOutcome {
        contract_id,
        initial_number,
        execute_status: receipt.status,
        updated_number,
    })
}

async fn lookup<T: Transport>(
    ctx: &ScenarioContext<T>,
    contract_id: ContractId,
    name: &str,
) -> ScenarioResult<U256> {
    report::step(&format!("Calling getMobileNumber(\"{}\")", name));
    let result = ContractCallQuery::new()
        .contract_id(contract_id)
        .gas(ctx.config.contract.call_gas)
        .function(&LookupContract::getMobileNumberCall {
            name: name.to_string(),
        })
        .execute(&ctx.client)
        .await?;
    let number = result.get_uint256(0)?;
    report::done(&format!("getMobileNumber(\"{}\") = {}", name, number));
    Ok(number)
}
