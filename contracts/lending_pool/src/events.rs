use soroban_sdk::{contracttype, Address, Symbol};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetListedEvent {
    pub asset: Address,
    pub symbol: Symbol,
    pub decimals: u32,
    pub price_feed: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollateralDepositedEvent {
    pub owner: Address,
    pub asset: Address,
    pub amount: i128,
    pub new_balance: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollateralWithdrawnEvent {
    pub owner: Address,
    pub asset: Address,
    pub amount: i128,
    pub new_balance: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanTakenEvent {
    pub borrower: Address,
    pub amount: i128,
    pub debt: i128,
    pub due_date: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanRepaidEvent {
    pub borrower: Address,
    pub amount: i128,
    pub repaid: i128,
    pub outstanding: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReservesFundedEvent {
    pub from: Address,
    pub amount: i128,
}
