#![forbid(unsafe_code)]

//! The five data-entry screens and their record keys.
//!
//! Each screen is nothing but a [`FormSchema`]: field descriptors plus
//! notification texts. All screens run on the same generic controller.
//!
//! # Record keys
//!
//! | Screen | [`KeyPolicy::Legacy`] | [`KeyPolicy::Distinct`] |
//! |---|---|---|
//! | profile | `perfil` | `perfil` |
//! | address | `endereco` | `endereco` |
//! | payment card | `pagamento` | `pagamento` |
//! | plan registration | `plano` | `cadastro_plano` |
//! | store plan | `plano` | `plano` |
//!
//! Under the legacy policy the two plan screens share `plano`, so saving one
//! overwrites the other. [`RecordKeyTable::collisions`] reports this.

use std::collections::BTreeMap;
use std::fmt;

use recform_core::{FieldDescriptor, FormSchema, MaskKind, RecordKey, SchemaError, ScreenMessages};

const CHOICE_MESSAGE: &str = "Opção inválida";
const PHONE_PATTERN: &str = r"\(\d{2}\) \d{5}-\d{4}";
const CPF_PATTERN: &str = r"\d{3}\.\d{3}\.\d{3}-\d{2}";
const CEP_PATTERN: &str = r"\d{5}-\d{3}";
const DAY_MONTH_PATTERN: &str = r"(0[1-9]|[12][0-9]|3[01])/(0[1-9]|1[0-2])";
const CARD_VALIDITY_PATTERN: &str = r"(0[1-9]|1[0-2])/\d{2}";

// ---------------------------------------------------------------------------
// Key policy
// ---------------------------------------------------------------------------

/// How record keys are assigned to screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    /// Historical keys; both plan screens use `plano`.
    #[default]
    Legacy,
    /// Plan registration moves to `cadastro_plano`.
    Distinct,
}

impl KeyPolicy {
    /// Parse `legacy` or `distinct` (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "legacy" => Some(Self::Legacy),
            "distinct" => Some(Self::Distinct),
            _ => None,
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Distinct => "distinct",
        }
    }
}

impl fmt::Display for KeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// One data-entry screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Screen {
    /// Personal profile.
    Profile,
    /// Postal address.
    Address,
    /// Payment card.
    PaymentCard,
    /// Plan registration.
    PlanRegistration,
    /// Store plan payment.
    StorePlan,
}

impl Screen {
    /// Every screen, in menu order.
    pub const ALL: [Screen; 5] = [
        Screen::Profile,
        Screen::Address,
        Screen::PaymentCard,
        Screen::PlanRegistration,
        Screen::StorePlan,
    ];

    /// Route-style name (`perfil`, `endereco`, `cartao`, ...).
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Profile => "perfil",
            Self::Address => "endereco",
            Self::PaymentCard => "cartao",
            Self::PlanRegistration => "cadastro-plano",
            Self::StorePlan => "plano-loja",
        }
    }

    /// Parse a slug.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|s| s.slug() == value)
    }

    /// Screen title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Profile => "Perfil",
            Self::Address => "Endereço",
            Self::PaymentCard => "Pagamento",
            Self::PlanRegistration => "Cadastro de Plano",
            Self::StorePlan => "Plano de Pagamento",
        }
    }

    /// Record key under `policy`.
    #[must_use]
    pub fn key(self, policy: KeyPolicy) -> RecordKey {
        let key = match (self, policy) {
            (Self::Profile, _) => "perfil",
            (Self::Address, _) => "endereco",
            (Self::PaymentCard, _) => "pagamento",
            (Self::PlanRegistration, KeyPolicy::Legacy) => "plano",
            (Self::PlanRegistration, KeyPolicy::Distinct) => "cadastro_plano",
            (Self::StorePlan, _) => "plano",
        };
        RecordKey::new(key)
    }

    /// Build the screen's schema under `policy`.
    pub fn schema(self, policy: KeyPolicy) -> Result<FormSchema, SchemaError> {
        let builder = FormSchema::builder(self.key(policy).as_str(), self.title());
        match self {
            Self::Profile => profile(builder),
            Self::Address => address(builder),
            Self::PaymentCard => payment_card(builder),
            Self::PlanRegistration => plan_registration(builder),
            Self::StorePlan => store_plan(builder),
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

// ---------------------------------------------------------------------------
// Schemas
// ---------------------------------------------------------------------------

type Builder = recform_core::FormSchemaBuilder;

fn text(name: &str, label: &str, required: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, label).required(required)
}

fn phone(name: &str, label: &str, required: &str) -> Result<FieldDescriptor, SchemaError> {
    Ok(FieldDescriptor::new(name, label)
        .mask(MaskKind::Phone)
        .required(required)
        .pattern(PHONE_PATTERN, "Telefone inválido")?)
}

fn cpf() -> Result<FieldDescriptor, SchemaError> {
    Ok(FieldDescriptor::new("cpf", "CPF")
        .mask(MaskKind::CPF)
        .required("CPF é obrigatório")
        .pattern(CPF_PATTERN, "CPF inválido")?)
}

fn select(name: &str, label: &str, required: &str, options: &[(&str, &str)]) -> FieldDescriptor {
    FieldDescriptor::new(name, label)
        .required(required)
        .choices(options.iter().copied(), CHOICE_MESSAGE)
}

fn day_month(name: &str, label: &str, required: &str) -> Result<FieldDescriptor, SchemaError> {
    Ok(FieldDescriptor::new(name, label)
        .mask(MaskKind::DayMonth)
        .required(required)
        .pattern(DAY_MONTH_PATTERN, "Formato inválido (DD/MM)")?)
}

fn money(name: &str, label: &str, required: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, label)
        .mask(MaskKind::BRL)
        .required(required)
}

const BILLING_PERIODS: &[(&str, &str)] = &[
    ("mensal", "Mensal"),
    ("anual", "Anual"),
    ("semestral", "Semestral"),
];

fn profile(builder: Builder) -> Result<FormSchema, SchemaError> {
    builder
        .field(text("nome", "Nome", "Nome é obrigatório"))
        .field(
            FieldDescriptor::new("idade", "Idade")
                .required("Idade é obrigatória")
                .positive_integer(
                    "Idade deve ser um número",
                    "Idade deve ser positiva",
                    "Idade deve ser um número inteiro",
                ),
        )
        .field(phone("telefone", "Telefone", "Telefone é obrigatório")?)
        .field(select(
            "sexo",
            "Sexo",
            "Sexo é obrigatório",
            &[("masculino", "Masculino"), ("feminino", "Feminino")],
        ))
        .field(text("estadoCivil", "Estado Civil", "Estado civil é obrigatório"))
        .field(cpf()?)
        .field(text("nomeMae", "Nome da Mãe", "Nome da mãe é obrigatório"))
        .field(text("nomePai", "Nome do Pai", "Nome do pai é obrigatório"))
        .messages(ScreenMessages::new("Perfil salvo!", "Perfil excluído!"))
        .build()
}

fn address(builder: Builder) -> Result<FormSchema, SchemaError> {
    builder
        .field(text("endereco", "Endereço", "Endereço é obrigatório"))
        .field(text("bairro", "Bairro", "Bairro é obrigatório"))
        .field(text("cidade", "Cidade", "Cidade é obrigatória"))
        .field(text("estado", "Estado", "Estado é obrigatório"))
        .field(phone(
            "telefoneContato",
            "Telefone para Contato",
            "Telefone para contato é obrigatório",
        )?)
        .field(text("casa", "Número da Casa", "Número da Casa é obrigatório"))
        .field(text("complemento", "Complemento", "Complemento é obrigatório"))
        .field(
            FieldDescriptor::new("cep", "CEP")
                .mask(MaskKind::CEP)
                .required("CEP é obrigatório")
                .pattern(CEP_PATTERN, "CEP inválido")?,
        )
        .field(text(
            "pontoReferencia",
            "Ponto de Referência",
            "Ponto de referência é obrigatório",
        ))
        .messages(ScreenMessages::new("Endereço salvo!", "Endereço excluído!"))
        .build()
}

fn payment_card(builder: Builder) -> Result<FormSchema, SchemaError> {
    builder
        .field(
            FieldDescriptor::new("cvv", "CVV")
                .mask(MaskKind::digits(3))
                .required("CVV é obrigatório")
                .exact_length(3, "CVV deve ter 3 dígitos")
                .pattern(r"\d{3}", "CVV inválido")?,
        )
        .field(
            FieldDescriptor::new("numeroCartao", "Número do Cartão")
                .mask(MaskKind::digits(16))
                .required("Número do cartão é obrigatório")
                .pattern(r"\d{16}", "Número do cartão deve ter 16 dígitos")?,
        )
        .field(
            text("nomeCartao", "Nome no Cartão", "Nome no cartão é obrigatório")
                .min_length(5, "Nome no cartão deve ter pelo menos 5 caracteres"),
        )
        .field(cpf()?)
        .field(
            FieldDescriptor::new("validade", "Validade")
                .mask(MaskKind::DayMonth)
                .required("Validade é obrigatória")
                .pattern(CARD_VALIDITY_PATTERN, "Formato inválido (MM/AA)")?,
        )
        .field(select(
            "metodoPagamento",
            "Método de Pagamento",
            "Método de pagamento é obrigatório",
            &[("debito", "Débito"), ("credito", "Crédito")],
        ))
        .field(text(
            "enderecoCobertura",
            "Endereço de Cobrança",
            "Endereço de cobrança é obrigatório",
        ))
        .field(select(
            "tornarCartaoPadrao",
            "Tornar Cartão Padrão para Próximas Compras?",
            "Seleção é obrigatória",
            &[("sim", "Sim"), ("nao", "Não")],
        ))
        .messages(ScreenMessages::new(
            "Dados de pagamento salvos!",
            "Dados de pagamento excluídos!",
        ))
        .build()
}

fn plan_registration(builder: Builder) -> Result<FormSchema, SchemaError> {
    builder
        .field(text("nomePlano", "Nome do Plano", "Nome do plano é obrigatório"))
        .field(money("valorPlano", "Valor do Plano", "Valor do plano é obrigatório"))
        .field(select(
            "formasPagamento",
            "Formas de Pagamento",
            "Forma de pagamento é obrigatória",
            &[("dinheiro", "Dinheiro"), ("cartao", "Cartão")],
        ))
        .field(select(
            "tempoPagamento",
            "Tempo de Pagamento",
            "Tempo de pagamento é obrigatório",
            BILLING_PERIODS,
        ))
        .field(select(
            "funcionalidade",
            "Funcionalidade do Plano",
            "Funcionalidade é obrigatória",
            &[
                ("assinaturas", "Assinaturas"),
                ("cashback", "Cashback"),
                ("sorteios", "Sorteios"),
                ("mercazap", "Mercazap"),
                ("relatorios", "Relatórios"),
            ],
        ))
        .field(text("descricao", "Descrição", "Descrição é obrigatória"))
        .field(select(
            "implantacao",
            "Tempo de Implantação",
            "Tempo de implantação é obrigatório",
            &[("30", "30 dias"), ("60", "60 dias"), ("90", "90 dias")],
        ))
        .field(money(
            "taxaImplantacao",
            "Valor da Taxa de Implantação",
            "Valor da taxa de implantação é obrigatório",
        ))
        .messages(ScreenMessages::new(
            "Plano cadastrado com sucesso!",
            "Plano excluído com sucesso!",
        ))
        .build()
}

fn store_plan(builder: Builder) -> Result<FormSchema, SchemaError> {
    builder
        .field(
            money("valorPlano", "Valor do Plano", "Valor do plano é obrigatório")
                .normalize_on_submit(),
        )
        .field(day_month(
            "dataExpiracao",
            "Data de Expiração do Contrato",
            "Data de expiração é obrigatória",
        )?)
        .field(day_month(
            "dataVencimento",
            "Data de Vencimento do Pagamento",
            "Data de vencimento é obrigatória",
        )?)
        .field(day_month(
            "dataRenovacao",
            "Data de Renovação do Pagamento",
            "Data de renovação é obrigatória",
        )?)
        .field(
            FieldDescriptor::new("numeroContrato", "Número do Contrato")
                .mask(MaskKind::unbounded_digits())
                .required("Número do contrato é obrigatório")
                .pattern(
                    r"\d{5,}",
                    "Número do contrato deve ser numérico e ter pelo menos 5 dígitos",
                )?,
        )
        .field(select(
            "tipoPagamento",
            "Tipo de Pagamento",
            "Tipo de pagamento é obrigatório",
            BILLING_PERIODS,
        ))
        .field(select(
            "cartaoUsado",
            "Cartão Usado para Pagamento",
            "Cartão usado é obrigatório",
            &[
                ("visa", "Visa"),
                ("mastercard", "MasterCard"),
                ("amex", "American Express"),
                ("elo", "Elo"),
            ],
        ))
        .messages(ScreenMessages::new(
            "Plano de pagamento salvo!",
            "Plano de pagamento excluído!",
        ))
        .build()
}

// ---------------------------------------------------------------------------
// Record key table
// ---------------------------------------------------------------------------

/// Screens that share one record key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCollision {
    /// The shared key.
    pub key: RecordKey,
    /// Screens writing to it, in menu order.
    pub screens: Vec<Screen>,
}

impl fmt::Display for KeyCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.screens.iter().map(|s| s.slug()).collect();
        write!(f, "key {:?} is shared by {}", self.key.as_str(), names.join(", "))
    }
}

/// Record key of every screen under one policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKeyTable {
    policy: KeyPolicy,
    entries: Vec<(Screen, RecordKey)>,
}

impl RecordKeyTable {
    /// Table for `policy`.
    #[must_use]
    pub fn new(policy: KeyPolicy) -> Self {
        Self {
            policy,
            entries: Screen::ALL.iter().map(|&s| (s, s.key(policy))).collect(),
        }
    }

    /// The policy the table was built with.
    #[must_use]
    pub fn policy(&self) -> KeyPolicy {
        self.policy
    }

    /// `(screen, key)` pairs in menu order.
    #[must_use]
    pub fn entries(&self) -> &[(Screen, RecordKey)] {
        &self.entries
    }

    /// Key of one screen.
    #[must_use]
    pub fn key(&self, screen: Screen) -> Option<&RecordKey> {
        self.entries
            .iter()
            .find(|(s, _)| *s == screen)
            .map(|(_, key)| key)
    }

    /// Keys written by more than one screen.
    #[must_use]
    pub fn collisions(&self) -> Vec<KeyCollision> {
        let mut by_key: BTreeMap<&RecordKey, Vec<Screen>> = BTreeMap::new();
        for (screen, key) in &self.entries {
            by_key.entry(key).or_default().push(*screen);
        }
        by_key
            .into_iter()
            .filter(|(_, screens)| screens.len() > 1)
            .map(|(key, screens)| KeyCollision {
                key: key.clone(),
                screens,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_schema_builds_under_both_policies() {
        for policy in [KeyPolicy::Legacy, KeyPolicy::Distinct] {
            for screen in Screen::ALL {
                let schema = screen.schema(policy).unwrap();
                assert_eq!(schema.key(), &screen.key(policy));
                assert!(!schema.fields().is_empty());
            }
        }
    }

    #[test]
    fn field_counts_match_screens() {
        let count = |s: Screen| s.schema(KeyPolicy::Legacy).unwrap().fields().len();
        assert_eq!(count(Screen::Profile), 8);
        assert_eq!(count(Screen::Address), 9);
        assert_eq!(count(Screen::PaymentCard), 8);
        assert_eq!(count(Screen::PlanRegistration), 8);
        assert_eq!(count(Screen::StorePlan), 7);
    }

    #[test]
    fn legacy_policy_collides_on_plano() {
        let collisions = RecordKeyTable::new(KeyPolicy::Legacy).collisions();
        assert_eq!(
            collisions,
            vec![KeyCollision {
                key: RecordKey::new("plano"),
                screens: vec![Screen::PlanRegistration, Screen::StorePlan],
            }]
        );
        assert_eq!(
            collisions[0].to_string(),
            "key \"plano\" is shared by cadastro-plano, plano-loja"
        );
    }

    #[test]
    fn distinct_policy_has_no_collisions() {
        let table = RecordKeyTable::new(KeyPolicy::Distinct);
        assert!(table.collisions().is_empty());
        assert_eq!(
            table.key(Screen::PlanRegistration).map(RecordKey::as_str),
            Some("cadastro_plano")
        );
        assert_eq!(table.policy(), KeyPolicy::Distinct);
    }

    #[test]
    fn slugs_round_trip() {
        for screen in Screen::ALL {
            assert_eq!(Screen::parse(screen.slug()), Some(screen));
        }
        assert_eq!(Screen::parse("nope"), None);
    }

    #[test]
    fn key_policy_parse() {
        assert_eq!(KeyPolicy::parse("Distinct"), Some(KeyPolicy::Distinct));
        assert_eq!(KeyPolicy::parse(" legacy "), Some(KeyPolicy::Legacy));
        assert_eq!(KeyPolicy::parse("other"), None);
        assert_eq!(KeyPolicy::default(), KeyPolicy::Legacy);
    }

    #[test]
    fn only_store_plan_normalizes_currency() {
        let normalizing: Vec<(Screen, String)> = Screen::ALL
            .into_iter()
            .flat_map(|screen| {
                let schema = screen.schema(KeyPolicy::Legacy).unwrap();
                schema
                    .fields()
                    .iter()
                    .filter(|f| f.normalizes_on_submit())
                    .map(|f| (screen, f.name().to_string()))
                    .collect::<Vec<_>>()
            })
            .collect();
        assert_eq!(normalizing, vec![(Screen::StorePlan, "valorPlano".to_string())]);
    }
}
