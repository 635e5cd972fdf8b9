#![no_std]

use soroban_sdk::{
    contract, contracterror, contractevent, contractimpl, contracttype, log, Address, BytesN,
    Env, IntoVal, String, Symbol,
};
use ticketing_types::{
    Deployment, TicketConfig, INSTANCE_TTL_EXTEND, INSTANCE_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND,
    PERSISTENT_TTL_THRESHOLD,
};

#[contract]
pub struct TicketingDeployer;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum DeployerError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
}

/// Storage keys for the deployer contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Admin address, also the admin of every deployed pair
    Admin,
    /// Ticket contract WASM hash
    TicketWasmHash,
    /// Marketplace contract WASM hash
    MarketplaceWasmHash,
    /// Number of pairs deployed (counter for indexed storage)
    DeploymentCount,
    /// Deployment at index
    DeploymentAt(u32),
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deployed {
    #[topic]
    pub index: u32,
    pub ticket: Address,
    pub marketplace: Address,
}

// Salt layout: deployment index (big endian) in bytes 0..4, role in byte 4
const ROLE_TICKET: u8 = 0;
const ROLE_MARKETPLACE: u8 = 1;

#[contractimpl]
impl TicketingDeployer {
    /// Initialize the deployer with its admin and the uploaded WASM hashes
    pub fn initialize(
        env: Env,
        admin: Address,
        ticket_wasm_hash: BytesN<32>,
        marketplace_wasm_hash: BytesN<32>,
    ) -> Result<(), DeployerError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(DeployerError::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::TicketWasmHash, &ticket_wasm_hash);
        env.storage()
            .instance()
            .set(&DataKey::MarketplaceWasmHash, &marketplace_wasm_hash);
        env.storage()
            .instance()
            .set(&DataKey::DeploymentCount, &0u32);

        extend_instance_ttl(&env);
        Ok(())
    }

    /// Deploy a Ticket and a Marketplace, initialize both and wire them to
    /// each other. Returns `(ticket, marketplace)`.
    pub fn deploy(
        env: Env,
        name: String,
        symbol: String,
        base_uri: String,
        payment_token: Address,
    ) -> Result<(Address, Address), DeployerError> {
        let admin = get_admin(&env)?;
        admin.require_auth();

        let ticket_wasm_hash: BytesN<32> = env
            .storage()
            .instance()
            .get(&DataKey::TicketWasmHash)
            .ok_or(DeployerError::NotInitialized)?;
        let marketplace_wasm_hash: BytesN<32> = env
            .storage()
            .instance()
            .get(&DataKey::MarketplaceWasmHash)
            .ok_or(DeployerError::NotInitialized)?;

        let index = Self::deployment_count(env.clone());

        let ticket = env
            .deployer()
            .with_current_contract(salt(&env, index, ROLE_TICKET))
            .deploy_v2(ticket_wasm_hash, ());
        let marketplace = env
            .deployer()
            .with_current_contract(salt(&env, index, ROLE_MARKETPLACE))
            .deploy_v2(marketplace_wasm_hash, ());

        let deployment = finish_deployment(
            &env,
            index,
            ticket,
            marketplace,
            &TicketConfig {
                admin,
                name,
                symbol,
                base_uri,
            },
            &payment_token,
        );

        Ok((deployment.ticket, deployment.marketplace))
    }

    /// Get total number of pairs deployed
    pub fn deployment_count(env: Env) -> u32 {
        extend_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::DeploymentCount)
            .unwrap_or(0)
    }

    /// Get the pair deployed at `index`
    pub fn get_deployment(env: Env, index: u32) -> Option<Deployment> {
        env.storage()
            .persistent()
            .get(&DataKey::DeploymentAt(index))
    }

    pub fn get_admin(env: Env) -> Result<Address, DeployerError> {
        get_admin(&env)
    }

    pub fn get_ticket_wasm_hash(env: Env) -> Result<BytesN<32>, DeployerError> {
        extend_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::TicketWasmHash)
            .ok_or(DeployerError::NotInitialized)
    }

    pub fn get_marketplace_wasm_hash(env: Env) -> Result<BytesN<32>, DeployerError> {
        extend_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::MarketplaceWasmHash)
            .ok_or(DeployerError::NotInitialized)
    }
}

fn get_admin(env: &Env) -> Result<Address, DeployerError> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(DeployerError::NotInitialized)
}

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

/// Initialize and wire a freshly deployed pair, then record it at `index`
fn finish_deployment(
    env: &Env,
    index: u32,
    ticket: Address,
    marketplace: Address,
    ticket_config: &TicketConfig,
    payment_token: &Address,
) -> Deployment {
    init_ticket(env, &ticket, ticket_config);
    init_marketplace(env, &marketplace, &ticket_config.admin, payment_token);

    wire(env, &marketplace, "set_nft_contract_address", &ticket);
    wire(env, &ticket, "set_marketplace_contract_address", &marketplace);

    let deployment = Deployment {
        ticket,
        marketplace,
        ledger: env.ledger().sequence(),
    };
    let key = DataKey::DeploymentAt(index);
    env.storage().persistent().set(&key, &deployment);
    extend_persistent_ttl(env, &key);

    env.storage()
        .instance()
        .set(&DataKey::DeploymentCount, &(index + 1));
    extend_instance_ttl(env);

    log!(env, "Ticket address: {}", deployment.ticket);
    log!(env, "Marketplace address: {}", deployment.marketplace);
    Deployed {
        index,
        ticket: deployment.ticket.clone(),
        marketplace: deployment.marketplace.clone(),
    }
    .publish(env);

    deployment
}

fn salt(env: &Env, index: u32, role: u8) -> BytesN<32> {
    let mut salt_bytes = [0u8; 32];
    salt_bytes[0..4].copy_from_slice(&index.to_be_bytes());
    salt_bytes[4] = role;
    BytesN::from_array(env, &salt_bytes)
}

fn init_ticket(env: &Env, ticket: &Address, config: &TicketConfig) {
    env.invoke_contract::<()>(
        ticket,
        &Symbol::new(env, "initialize"),
        (&config.admin, &config.name, &config.symbol, &config.base_uri).into_val(env),
    );
}

fn init_marketplace(env: &Env, marketplace: &Address, admin: &Address, payment_token: &Address) {
    env.invoke_contract::<()>(
        marketplace,
        &Symbol::new(env, "initialize"),
        (admin, payment_token).into_val(env),
    );
}

// Admin-only setter taking the counterpart's address
fn wire(env: &Env, target: &Address, func: &str, counterpart: &Address) {
    env.invoke_contract::<()>(
        target,
        &Symbol::new(env, func),
        (counterpart,).into_val(env),
    );
}
