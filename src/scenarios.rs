//! Prebuilt investigation scenarios
//!
//! Canned cases with known expected outcomes, shared by the test suite and
//! the demo binary. Amounts and patterns mirror the typologies the Risk
//! Analyst is expected to recognize.

use crate::models::{
    AccountRecord, ActivityClassification, CaseData, CustomerRecord, RiskAssessment, RiskLevel,
    RiskRating, TransactionRecord,
};
use chrono::Utc;
use std::collections::HashMap;

/// A canned case plus the outcome a correct analysis should reach
#[derive(Debug, Clone)]
pub struct RiskScenario {
    pub name: &'static str,
    pub description: &'static str,
    pub expected_classification: ActivityClassification,
    pub expected_risk_level: RiskLevel,
    pub min_confidence: f64,
    pub case: CaseData,
}

/// A canned assessment plus the properties a compliant narrative must have
#[derive(Debug, Clone)]
pub struct NarrativeScenario {
    pub name: &'static str,
    pub description: &'static str,
    pub assessment: RiskAssessment,
    pub expected_elements: Vec<&'static str>,
    pub required_citations: Vec<&'static str>,
}

pub fn risk_scenarios() -> Vec<RiskScenario> {
    vec![
        structuring_classic(),
        money_laundering_complex(),
        fraud_identity(),
        sanctions_violation(),
        benign_activity(),
    ]
}

pub fn narrative_scenarios() -> Vec<NarrativeScenario> {
    vec![
        structuring_narrative(),
        money_laundering_narrative(),
        fraud_narrative(),
        sanctions_narrative(),
    ]
}

fn case(
    name: &str,
    customer: CustomerRecord,
    account: AccountRecord,
    transactions: Vec<TransactionRecord>,
) -> CaseData {
    CaseData {
        case_id: format!("CASE_{}", name.to_uppercase()),
        customer,
        accounts: vec![account],
        transactions,
        created_at: Utc::now(),
        data_sources: HashMap::from([(
            "scenario".to_string(),
            name.to_string(),
        )]),
    }
}

fn txn(
    id: &str,
    account_id: &str,
    amount: f64,
    transaction_type: &str,
    date: &str,
    description: &str,
    counterparty: Option<&str>,
    location: Option<&str>,
) -> TransactionRecord {
    TransactionRecord {
        transaction_id: id.to_string(),
        account_id: account_id.to_string(),
        date: date.to_string(),
        transaction_type: transaction_type.to_string(),
        amount,
        description: description.to_string(),
        counterparty: counterparty.map(String::from),
        location: location.map(String::from),
    }
}

/// Multiple cash deposits just under the $10K threshold
pub fn structuring_classic() -> RiskScenario {
    let customer = CustomerRecord {
        customer_id: "CUST_STRUCT_001".to_string(),
        name: "Sarah Thompson".to_string(),
        date_of_birth: "1985-03-15".to_string(),
        ssn_last_4: "4567".to_string(),
        address: "456 Oak Avenue, Springfield, IL 62701".to_string(),
        customer_since: "2018-06-01".to_string(),
        risk_rating: RiskRating::Medium,
        phone: None,
        occupation: None,
        annual_income: None,
    };
    let account = AccountRecord {
        account_id: "ACC_CHK_4567".to_string(),
        customer_id: "CUST_STRUCT_001".to_string(),
        account_type: "Checking".to_string(),
        opening_date: "2018-06-01".to_string(),
        current_balance: 45_000.0,
        average_monthly_balance: 35_000.0,
        status: "Active".to_string(),
    };
    let transactions = vec![
        txn(
            "TXN_STRUCT_001", "ACC_CHK_4567", 9_800.0, "Cash_Deposit",
            "2024-01-15", "Cash deposit", None, Some("Springfield Branch"),
        ),
        txn(
            "TXN_STRUCT_002", "ACC_CHK_4567", 9_500.0, "Cash_Deposit",
            "2024-01-16", "Cash deposit", None, Some("Downtown Branch"),
        ),
        txn(
            "TXN_STRUCT_003", "ACC_CHK_4567", 9_900.0, "Cash_Deposit",
            "2024-01-17", "Cash deposit", None, Some("Springfield Branch"),
        ),
    ];

    RiskScenario {
        name: "structuring_classic",
        description: "Multiple cash deposits just under $10K threshold",
        expected_classification: ActivityClassification::Structuring,
        expected_risk_level: RiskLevel::High,
        min_confidence: 0.8,
        case: case("structuring_classic", customer, account, transactions),
    }
}

/// Large wire transfers to high-risk jurisdictions with layering
pub fn money_laundering_complex() -> RiskScenario {
    let customer = CustomerRecord {
        customer_id: "CUST_ML_001".to_string(),
        name: "International Trading Corp".to_string(),
        date_of_birth: "1975-12-01".to_string(),
        ssn_last_4: "9876".to_string(),
        address: "789 Business Plaza, Miami, FL 33101".to_string(),
        customer_since: "2019-03-15".to_string(),
        risk_rating: RiskRating::High,
        phone: None,
        occupation: None,
        annual_income: None,
    };
    let account = AccountRecord {
        account_id: "ACC_BUS_9876".to_string(),
        customer_id: "CUST_ML_001".to_string(),
        account_type: "Business".to_string(),
        opening_date: "2019-03-15".to_string(),
        current_balance: 125_000.0,
        average_monthly_balance: 200_000.0,
        status: "Active".to_string(),
    };
    let transactions = vec![
        txn(
            "TXN_ML_001", "ACC_BUS_9876", 250_000.0, "Wire_Transfer",
            "2024-01-10", "International wire transfer",
            Some("Offshore Finance Ltd"), Some("Cayman Islands"),
        ),
        txn(
            "TXN_ML_002", "ACC_BUS_9876", 180_000.0, "Wire_Transfer",
            "2024-01-12", "Business payment",
            Some("Global Investments SA"), Some("Switzerland"),
        ),
        txn(
            "TXN_ML_003", "ACC_BUS_9876", 320_000.0, "Wire_Transfer",
            "2024-01-15", "Investment transfer",
            Some("Pacific Holdings"), Some("Hong Kong"),
        ),
    ];

    RiskScenario {
        name: "money_laundering_complex",
        description: "Large wires to high-risk jurisdictions with layered transactions",
        expected_classification: ActivityClassification::MoneyLaundering,
        expected_risk_level: RiskLevel::Critical,
        min_confidence: 0.85,
        case: case("money_laundering_complex", customer, account, transactions),
    }
}

/// Rapid account activity inconsistent with the customer's profile
pub fn fraud_identity() -> RiskScenario {
    let customer = CustomerRecord {
        customer_id: "CUST_FRAUD_001".to_string(),
        name: "Eleanor Whitfield".to_string(),
        date_of_birth: "1945-08-20".to_string(),
        ssn_last_4: "2468".to_string(),
        address: "123 Retirement Village, Tampa, FL 33601".to_string(),
        customer_since: "2010-02-01".to_string(),
        risk_rating: RiskRating::Low,
        phone: None,
        occupation: Some("Retired".to_string()),
        annual_income: None,
    };
    let account = AccountRecord {
        account_id: "ACC_SAV_2468".to_string(),
        customer_id: "CUST_FRAUD_001".to_string(),
        account_type: "Savings".to_string(),
        opening_date: "2010-02-01".to_string(),
        current_balance: 2_500.0,
        average_monthly_balance: 15_000.0,
        status: "Active".to_string(),
    };
    let transactions = vec![
        txn(
            "TXN_FRAUD_001", "ACC_SAV_2468", 45_000.0, "ACH_Transfer",
            "2024-01-20", "Online transfer",
            Some("Unknown Recipient"), Some("Online"),
        ),
        txn(
            "TXN_FRAUD_002", "ACC_SAV_2468", 30_000.0, "Wire_Transfer",
            "2024-01-21", "Urgent wire transfer",
            Some("Foreign Exchange Co"), Some("Online"),
        ),
    ];

    RiskScenario {
        name: "fraud_identity",
        description: "Rapid account activity inconsistent with customer profile",
        expected_classification: ActivityClassification::Fraud,
        expected_risk_level: RiskLevel::High,
        min_confidence: 0.75,
        case: case("fraud_identity", customer, account, transactions),
    }
}

/// Transactions involving sanctioned entities
pub fn sanctions_violation() -> RiskScenario {
    let customer = CustomerRecord {
        customer_id: "CUST_SANC_001".to_string(),
        name: "Import Export LLC".to_string(),
        date_of_birth: "1982-04-10".to_string(),
        ssn_last_4: "1357".to_string(),
        address: "555 Trade Center, New York, NY 10001".to_string(),
        customer_since: "2020-09-15".to_string(),
        risk_rating: RiskRating::High,
        phone: None,
        occupation: None,
        annual_income: None,
    };
    let account = AccountRecord {
        account_id: "ACC_BUS_1357".to_string(),
        customer_id: "CUST_SANC_001".to_string(),
        account_type: "Business".to_string(),
        opening_date: "2020-09-15".to_string(),
        current_balance: 85_000.0,
        average_monthly_balance: 150_000.0,
        status: "Active".to_string(),
    };
    let transactions = vec![txn(
        "TXN_SANC_001", "ACC_BUS_1357", 95_000.0, "Wire_Transfer",
        "2024-01-25", "Trade payment",
        Some("Sanctioned Entity Corp"), Some("Restricted Country"),
    )];

    RiskScenario {
        name: "sanctions_violation",
        description: "Transactions involving sanctioned entities",
        expected_classification: ActivityClassification::Sanctions,
        expected_risk_level: RiskLevel::Critical,
        min_confidence: 0.90,
        case: case("sanctions_violation", customer, account, transactions),
    }
}

/// Normal business transactions that should not trigger alerts
pub fn benign_activity() -> RiskScenario {
    let customer = CustomerRecord {
        customer_id: "CUST_NORMAL_001".to_string(),
        name: "Local Restaurant Inc".to_string(),
        date_of_birth: "1990-07-05".to_string(),
        ssn_last_4: "8642".to_string(),
        address: "111 Main Street, Anytown, USA 12345".to_string(),
        customer_since: "2015-01-15".to_string(),
        risk_rating: RiskRating::Low,
        phone: None,
        occupation: None,
        annual_income: None,
    };
    let account = AccountRecord {
        account_id: "ACC_BUS_8642".to_string(),
        customer_id: "CUST_NORMAL_001".to_string(),
        account_type: "Business".to_string(),
        opening_date: "2015-01-15".to_string(),
        current_balance: 25_000.0,
        average_monthly_balance: 28_000.0,
        status: "Active".to_string(),
    };
    let transactions = vec![
        txn(
            "TXN_NORM_001", "ACC_BUS_8642", 3_500.0, "Cash_Deposit",
            "2024-01-15", "Daily cash deposit", None, Some("Local Branch"),
        ),
        txn(
            "TXN_NORM_002", "ACC_BUS_8642", 1_200.0, "ACH_Transfer",
            "2024-01-16", "Supplier payment",
            Some("Food Supplier Co"), Some("ACH"),
        ),
    ];

    RiskScenario {
        name: "benign_activity",
        description: "Normal business transactions that should not trigger alerts",
        expected_classification: ActivityClassification::Other,
        expected_risk_level: RiskLevel::Low,
        min_confidence: 0.6,
        case: case("benign_activity", customer, account, transactions),
    }
}

//
// ================= Narrative Scenarios =================
//

pub fn structuring_narrative() -> NarrativeScenario {
    NarrativeScenario {
        name: "structuring_narrative",
        description: "Generate compliant narrative for structuring activity",
        assessment: RiskAssessment {
            classification: ActivityClassification::Structuring,
            confidence_score: 0.85,
            reasoning: "Multiple cash deposits just under $10,000 threshold over 3 consecutive days"
                .to_string(),
            key_indicators: vec![
                "threshold avoidance".to_string(),
                "repeated amounts".to_string(),
                "cash deposits".to_string(),
                "multiple locations".to_string(),
            ],
            risk_level: RiskLevel::High,
        },
        expected_elements: vec![
            "Bank Secrecy Act",
            "$10,000",
            "currency transaction reporting",
            "structuring",
        ],
        required_citations: vec!["31 USC 5324", "BSA"],
    }
}

pub fn money_laundering_narrative() -> NarrativeScenario {
    NarrativeScenario {
        name: "money_laundering_narrative",
        description: "Generate compliant narrative for money laundering activity",
        assessment: RiskAssessment {
            classification: ActivityClassification::MoneyLaundering,
            confidence_score: 0.90,
            reasoning: "Large wire transfers to high-risk jurisdictions with complex layering pattern"
                .to_string(),
            key_indicators: vec![
                "high-risk jurisdictions".to_string(),
                "large amounts".to_string(),
                "layered transactions".to_string(),
                "shell companies".to_string(),
            ],
            risk_level: RiskLevel::Critical,
        },
        expected_elements: vec!["money laundering", "high-risk", "wire transfer", "layering"],
        required_citations: vec!["18 USC 1956", "BSA"],
    }
}

pub fn fraud_narrative() -> NarrativeScenario {
    NarrativeScenario {
        name: "fraud_narrative",
        description: "Generate compliant narrative for fraud activity",
        assessment: RiskAssessment {
            classification: ActivityClassification::Fraud,
            confidence_score: 0.78,
            reasoning: "Elderly customer account showing uncharacteristic large online transfers"
                .to_string(),
            key_indicators: vec![
                "profile inconsistency".to_string(),
                "elderly customer".to_string(),
                "online activity".to_string(),
                "large amounts".to_string(),
            ],
            risk_level: RiskLevel::High,
        },
        expected_elements: vec!["fraud", "elderly", "inconsistent", "online"],
        required_citations: vec!["18 USC 1344", "BSA"],
    }
}

pub fn sanctions_narrative() -> NarrativeScenario {
    NarrativeScenario {
        name: "sanctions_narrative",
        description: "Generate compliant narrative for sanctions violation",
        assessment: RiskAssessment {
            classification: ActivityClassification::Sanctions,
            confidence_score: 0.95,
            reasoning: "Wire transfer to entity on OFAC sanctions list".to_string(),
            key_indicators: vec![
                "sanctioned entity".to_string(),
                "OFAC list".to_string(),
                "prohibited transaction".to_string(),
            ],
            risk_level: RiskLevel::Critical,
        },
        expected_elements: vec!["sanctions", "OFAC", "prohibited", "violation"],
        required_citations: vec!["31 CFR 501", "OFAC"],
    }
}
