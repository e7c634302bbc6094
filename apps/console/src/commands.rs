//! Command parsing and execution for the `gestock` binary.

use std::path::PathBuf;

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use gestock_client::{
    import_file, product_template_csv, AppStore, AuthStore, ClientError, SessionStorage,
    TenantAdmin,
};
use gestock_core::search::search_products;
use gestock_core::stats::{category_breakdown, DateRange};
use gestock_core::{Money, NewPurchase, NewSale};

pub const USAGE: &str = "\
Usage: gestock <commande> [arguments]

Commandes:
  login <email> <mot_de_passe>
  logout
  whoami
  summary
  products [recherche]
  import <fichier.csv|fichier.xlsx>
  template [fichier.csv]
  sell <produit_id> <quantite> <prix_unitaire> [client]
  buy <produit_id> <fournisseur_id> <quantite> <prix_unitaire>
  report <AAAA-MM-JJ> <AAAA-MM-JJ>
  tenants
  extend <client_id> <mois>";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Usage(String),

    #[error("Accès refusé: {0}")]
    Forbidden(&'static str),

    #[error("Import interrompu après {created} produit(s) sur « {product} »: {message}")]
    ImportStopped {
        created: usize,
        product: String,
        message: String,
    },

    #[error("{}", .0.user_message())]
    Client(#[from] ClientError),
}

pub type CommandResult<T> = Result<T, CommandError>;

/// Everything a command may need.
pub struct Context {
    pub auth: AuthStore,
    pub store: AppStore,
    pub tenants: TenantAdmin,
    pub storage: SessionStorage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { email: String, password: String },
    Logout,
    Whoami,
    Summary,
    Products { term: Option<String> },
    Import { path: PathBuf },
    Template { path: Option<PathBuf> },
    Sell { sale: NewSale },
    Buy { purchase: NewPurchase },
    Report { range: DateRange },
    Tenants,
    Extend { client_id: i64, months: i64 },
}

impl Command {
    pub fn parse(args: &[String]) -> CommandResult<Self> {
        let name = args
            .first()
            .ok_or_else(|| CommandError::Usage("Commande manquante".into()))?;
        let rest = &args[1..];

        let command = match name.as_str() {
            "login" => Command::Login {
                email: arg(rest, 0, "email")?.to_string(),
                password: arg(rest, 1, "mot_de_passe")?.to_string(),
            },
            "logout" => Command::Logout,
            "whoami" => Command::Whoami,
            "summary" => Command::Summary,
            "products" => Command::Products {
                term: (!rest.is_empty()).then(|| rest.join(" ")),
            },
            "import" => Command::Import {
                path: PathBuf::from(arg(rest, 0, "fichier")?),
            },
            "template" => Command::Template {
                path: rest.first().map(PathBuf::from),
            },
            "sell" => Command::Sell {
                sale: NewSale {
                    produit_id: int(rest, 0, "produit_id")?,
                    quantite: int(rest, 1, "quantite")?,
                    prix_unitaire: money(rest, 2, "prix_unitaire")?,
                    client_nom: rest.get(3..).map(|c| c.join(" ")).unwrap_or_default(),
                },
            },
            "buy" => Command::Buy {
                purchase: NewPurchase {
                    produit_id: int(rest, 0, "produit_id")?,
                    fournisseur_id: int(rest, 1, "fournisseur_id")?,
                    quantite: int(rest, 2, "quantite")?,
                    prix_unitaire: money(rest, 3, "prix_unitaire")?,
                },
            },
            "report" => Command::Report {
                range: DateRange::parse(arg(rest, 0, "debut")?, arg(rest, 1, "fin")?)
                    .map_err(|e| CommandError::Usage(e.to_string()))?,
            },
            "tenants" => Command::Tenants,
            "extend" => Command::Extend {
                client_id: int(rest, 0, "client_id")?,
                months: int(rest, 1, "mois")?,
            },
            other => return Err(CommandError::Usage(format!("Commande inconnue: {}", other))),
        };
        Ok(command)
    }
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> CommandResult<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| CommandError::Usage(format!("Argument manquant: {}", name)))
}

fn int(args: &[String], index: usize, name: &str) -> CommandResult<i64> {
    let raw = arg(args, index, name)?;
    raw.parse()
        .map_err(|_| CommandError::Usage(format!("{} doit être un entier: {}", name, raw)))
}

fn money(args: &[String], index: usize, name: &str) -> CommandResult<Money> {
    let raw = arg(args, index, name)?;
    Money::parse(raw).ok_or_else(|| CommandError::Usage(format!("{} invalide: {}", name, raw)))
}

// =============================================================================
// Execution
// =============================================================================

pub async fn run(ctx: &Context, command: Command) -> CommandResult<()> {
    match command {
        Command::Login { email, password } => {
            let user = ctx.auth.login(&email, &password).await?;
            println!("Connecté: {} ({})", user.display_name(), user.role);
        }

        Command::Logout => {
            ctx.auth.logout().await?;
            ctx.store.clear().await;
            println!("Déconnecté");
        }

        Command::Whoami => match ctx.auth.user().await {
            Some(user) => {
                println!("{} <{}> - {}", user.display_name(), user.email, user.role);
                if let Some(company) = ctx.storage.company_profile() {
                    if !company.nom_entreprise.is_empty() {
                        println!("Entreprise: {}", company.nom_entreprise);
                    }
                }
            }
            None => println!("Non connecté"),
        },

        Command::Summary => {
            ctx.auth.require_user().await?;
            ctx.store.load_all().await?;
            print_summary(&ctx.store).await;
        }

        Command::Products { term } => {
            ctx.auth.require_user().await?;
            ctx.store.refresh_products().await?;
            let products = ctx.store.products().await;
            for p in search_products(&products, term.as_deref().unwrap_or("")) {
                let alert = if p.is_low_stock() { "  ⚠ stock faible" } else { "" };
                println!(
                    "#{:<5} {:<30} {:>6} u  {:>14}{}",
                    p.id,
                    p.nom,
                    p.stock,
                    p.prix_vente.format_price(),
                    alert
                );
            }
        }

        Command::Import { path } => {
            ctx.auth.require_user().await?;
            if !ctx.auth.can_manage().await {
                return Err(CommandError::Forbidden("import de produits"));
            }

            let report = import_file(&path)?;
            for rejected in &report.rejected {
                println!("{}", rejected);
            }
            if report.accepted.is_empty() {
                println!("Aucun produit valide à importer");
                return Ok(());
            }

            let outcome = ctx.store.import_products(&report.accepted).await;
            if let Some(failure) = outcome.failed {
                return Err(CommandError::ImportStopped {
                    created: outcome.created.len(),
                    product: failure.product,
                    message: failure.message,
                });
            }
            println!("{} produit(s) importé(s)", outcome.created.len());
        }

        Command::Template { path } => {
            let template = product_template_csv()?;
            match path {
                Some(path) => {
                    std::fs::write(&path, template).map_err(ClientError::from)?;
                    println!("Modèle écrit dans {}", path.display());
                }
                None => print!("{}", template),
            }
        }

        Command::Sell { sale } => {
            ctx.auth.require_user().await?;
            if !ctx.auth.can_sell().await {
                return Err(CommandError::Forbidden("vente"));
            }

            ctx.store.refresh_products().await?;
            let created = ctx.store.add_sale(&sale).await?;
            let stock = ctx
                .store
                .product(created.produit_id)
                .await
                .map(|p| p.stock);
            println!("Vente #{} enregistrée: {}", created.id, created.prix_total.format_price());
            if let Some(stock) = stock {
                println!("Stock restant: {}", stock);
            }
        }

        Command::Buy { purchase } => {
            ctx.auth.require_user().await?;
            if !ctx.auth.can_buy().await {
                return Err(CommandError::Forbidden("achat"));
            }

            let created = ctx.store.add_purchase(&purchase).await?;
            println!(
                "Achat #{} enregistré: {}",
                created.id,
                created.prix_total.format_price()
            );
        }

        Command::Report { range } => {
            ctx.auth.require_user().await?;
            ctx.store.load_all().await?;
            let report = ctx.store.report(range).await;

            println!("Période du {} au {}", report.range.start, report.range.end);
            println!(
                "Ventes:    {} ({} opérations)",
                report.sales_total.format_price(),
                report.sales_count
            );
            println!(
                "Achats:    {} ({} opérations)",
                report.purchases_total.format_price(),
                report.purchases_count
            );
            println!("Bénéfice:  {}", report.profit.format_price());
            for (rank, top) in report.top_products.iter().enumerate() {
                println!(
                    "{:>2}. {:<30} {:>6} u  {:>14}",
                    rank + 1,
                    top.nom,
                    top.quantite,
                    top.montant.format_price()
                );
            }
        }

        Command::Tenants => {
            if !ctx.auth.is_super_admin().await {
                return Err(CommandError::Forbidden("réservé au super administrateur"));
            }
            let today = Utc::now().date_naive();
            for client in ctx.tenants.list_clients().await? {
                let status = match (client.actif, client.is_expired(today)) {
                    (false, _) => "suspendu",
                    (true, true) => "expiré",
                    (true, false) => "actif",
                };
                println!(
                    "#{:<5} {:<30} {:<10} {}",
                    client.id,
                    client.nom_entreprise,
                    status,
                    client.date_expiration.as_deref().unwrap_or("-")
                );
            }
        }

        Command::Extend { client_id, months } => {
            if !ctx.auth.is_super_admin().await {
                return Err(CommandError::Forbidden("réservé au super administrateur"));
            }
            ctx.tenants.extend_subscription(client_id, months).await?;
            println!("Abonnement prolongé de {} mois", months);
        }
    }

    info!("Command completed");
    Ok(())
}

async fn print_summary(store: &AppStore) {
    let stats = store.statistics(Utc::now()).await;
    let stock = store.stock_summary().await;

    println!("Produits:          {}", stats.total_products);
    println!("Unités en stock:   {}", stats.total_stock);
    println!("Valeur du stock:   {}", stock.valuation.format_price());
    println!("Ventes du mois:    {}", stats.month_sales.format_price());
    println!("Achats du mois:    {}", stats.month_purchases.format_price());
    println!(
        "Bénéfice du mois:  {} ({:.1} %)",
        stats.month_profit.format_price(),
        stats.month_margin_pct
    );

    let low = store.low_stock().await;
    if !low.is_empty() {
        println!("\nAlertes de stock ({}):", low.len());
        for p in &low {
            println!("  {} - {} / seuil {}", p.nom, p.stock, p.alert_threshold());
        }
    }

    let products = store.products().await;
    let categories = category_breakdown(&products);
    if !categories.is_empty() {
        println!("\nCatégories:");
        for (name, count) in categories {
            println!("  {:<25} {}", name, count);
        }
    }
}
