//! AgriTrace CLI — command-line client for the AgriTrace admin API.
//!
//! Set AGRITRACE_API_URL and AGRITRACE_API_TOKEN for entity commands.
//! Storage commands (upload, sign, rm, areas) additionally need
//! AGRITRACE_SIGN_URL and AGRITRACE_STORAGE_BASE_URL.

use agritrace_api_client::ApiClient;
use agritrace_cli::{content_type_for, init_tracing};
use agritrace_core::models::{
    ConfirmUpload, CreateProduct, DocumentType, PageRequest, RequestUploadUrl,
};
use agritrace_core::AdminConfig;
use agritrace_storage_client::{FileUploader, StorageClient, UploadConstraints};
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "agritrace", about = "AgriTrace admin API CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file into a logical directory of the storage container
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// Target directory, e.g. "products" or "companies"
        #[arg(long, default_value = "products")]
        dir: String,
    },
    /// Get a signed read URL for a stored object
    Sign {
        /// Container-relative path, e.g. products/abc123.jpg
        path: String,
        /// Validity window in minutes
        #[arg(long)]
        ttl: Option<i64>,
    },
    /// Delete stored objects by their container-relative paths
    Rm {
        /// Paths to delete
        paths: Vec<String>,
    },
    /// Product operations
    Products {
        #[command(subcommand)]
        sub: ProductCommands,
    },
    /// Company operations
    Companies {
        #[command(subcommand)]
        sub: CompanyCommands,
    },
    /// Geo-area imports
    Areas {
        #[command(subcommand)]
        sub: AreaCommands,
    },
}

#[derive(Subcommand)]
enum ProductCommands {
    /// List products with pagination and optional text search
    List {
        #[arg(long, default_value = "0")]
        page: u32,
        #[arg(long, default_value = "20")]
        size: u32,
        /// Free-text search filter
        #[arg(long)]
        q: Option<String>,
    },
    /// Get a single product by ID
    Get {
        /// Product UUID
        id: Uuid,
    },
    /// Create a new product
    Create {
        /// Product name
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a product
    Delete {
        /// Product UUID
        id: Uuid,
    },
    /// Set a product's status to ACTIVE
    Activate {
        /// Product UUID
        id: Uuid,
    },
    /// Set a product's status to INACTIVE
    Deactivate {
        /// Product UUID
        id: Uuid,
    },
}

#[derive(Subcommand)]
enum CompanyCommands {
    /// List companies with pagination and optional text search
    List {
        #[arg(long, default_value = "0")]
        page: u32,
        #[arg(long, default_value = "20")]
        size: u32,
        /// Free-text search filter
        #[arg(long)]
        q: Option<String>,
    },
    /// Get a single company by ID
    Get {
        /// Company UUID
        id: Uuid,
    },
    /// List documents attached to a company
    Documents {
        /// Company UUID
        id: Uuid,
    },
    /// Upload a document for a company via a signed upload URL
    UploadDocument {
        /// Company UUID
        id: Uuid,
        /// Path to the document file
        file: PathBuf,
        /// Document type: ruc, license, certificate, power_of_attorney, other
        #[arg(long, default_value = "other")]
        doc_type: String,
    },
}

fn parse_document_type(value: &str) -> anyhow::Result<DocumentType> {
    match value {
        "ruc" => Ok(DocumentType::Ruc),
        "license" => Ok(DocumentType::License),
        "certificate" => Ok(DocumentType::Certificate),
        "power_of_attorney" => Ok(DocumentType::PowerOfAttorney),
        "other" => Ok(DocumentType::Other),
        _ => anyhow::bail!(
            "Unknown document type '{}'. Expected ruc, license, certificate, power_of_attorney, or other",
            value
        ),
    }
}

#[derive(Subcommand)]
enum AreaCommands {
    /// Import a geo-area file (.geojson, .kml, .topojson, or .zip)
    Import {
        /// Path to the file to import
        file: PathBuf,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn storage_client() -> anyhow::Result<StorageClient> {
    let config = AdminConfig::from_env().context(
        "Storage commands need AGRITRACE_SIGN_URL and AGRITRACE_STORAGE_BASE_URL to be set",
    )?;
    let api = ApiClient::from_config(&config)?;
    Ok(StorageClient::from_config(api, &config))
}

async fn upload_file(
    api: ApiClient,
    file: &Path,
    dir: &str,
    constraints: &UploadConstraints,
) -> anyhow::Result<()> {
    let data =
        std::fs::read(file).with_context(|| format!("Failed to read file: {}", file.display()))?;
    let original_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file.bin");

    let uploader = FileUploader::new(api);
    let result = uploader
        .upload(
            original_name,
            content_type_for(file),
            data,
            dir,
            constraints,
        )
        .await?;
    print_json(&result)
}

fn page_request(page: u32, size: u32, q: Option<String>) -> PageRequest {
    let mut request = PageRequest::new(page, size);
    request.q = q;
    request
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload { file, dir } => {
            let config = AdminConfig::from_env()?;
            let api = ApiClient::from_config(&config)?;
            let constraints = UploadConstraints::from_config(&config);
            upload_file(api, &file, &dir, &constraints).await?;
        }
        Commands::Sign { path, ttl } => {
            let storage = storage_client()?;
            let url = match ttl {
                Some(minutes) => storage.file_url_with_ttl(&path, minutes).await?,
                None => storage.file_url(&path).await?,
            };
            print_json(&serde_json::json!({ "path": path, "url": url }))?;
        }
        Commands::Rm { paths } => {
            let storage = storage_client()?;
            storage.delete_files(&paths).await?;
            print_json(&serde_json::json!({ "deleted": paths.len() }))?;
        }
        Commands::Products { sub } => {
            let client = ApiClient::from_env()?;
            match sub {
                ProductCommands::List { page, size, q } => {
                    let response = client.list_products(&page_request(page, size, q)).await?;
                    print_json(&response)?;
                }
                ProductCommands::Get { id } => {
                    let response = client.get_product(id).await?;
                    print_json(&response)?;
                }
                ProductCommands::Create { name, description } => {
                    let dto = CreateProduct { name, description };
                    let response = client.create_product(&dto).await?;
                    print_json(&response)?;
                }
                ProductCommands::Delete { id } => {
                    client.delete_product(id).await?;
                    print_json(&serde_json::json!({ "status": "deleted", "id": id }))?;
                }
                ProductCommands::Activate { id } => {
                    let response = client.activate_product(id).await?;
                    print_json(&response)?;
                }
                ProductCommands::Deactivate { id } => {
                    let response = client.deactivate_product(id).await?;
                    print_json(&response)?;
                }
            }
        }
        Commands::Companies { sub } => {
            let client = ApiClient::from_env()?;
            match sub {
                CompanyCommands::List { page, size, q } => {
                    let response = client.list_companies(&page_request(page, size, q)).await?;
                    print_json(&response)?;
                }
                CompanyCommands::Get { id } => {
                    let response = client.get_company(id).await?;
                    print_json(&response)?;
                }
                CompanyCommands::Documents { id } => {
                    let response = client.list_company_documents(id).await?;
                    print_json(&response)?;
                }
                CompanyCommands::UploadDocument { id, file, doc_type } => {
                    let storage = storage_client()?;
                    let document_type = parse_document_type(&doc_type)?;
                    let data = std::fs::read(&file)
                        .with_context(|| format!("Failed to read file: {}", file.display()))?;
                    let original_name = file
                        .file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("document.pdf")
                        .to_string();
                    let content_type = content_type_for(&file);

                    let grant = client
                        .request_document_upload_url(
                            id,
                            &RequestUploadUrl {
                                file_name: original_name.clone(),
                                file_type: content_type.to_string(),
                                document_type,
                            },
                        )
                        .await?;

                    let size = data.len() as u64;
                    storage
                        .put_to_signed_url(&grant.upload_url, content_type, data)
                        .await?;

                    let file_name = grant
                        .blob_name
                        .rsplit('/')
                        .next()
                        .unwrap_or(&grant.blob_name)
                        .to_string();
                    let document = client
                        .confirm_document_upload(
                            id,
                            &ConfirmUpload {
                                file_name,
                                original_file_name: original_name,
                                document_type,
                                file_size: size,
                                mime_type: content_type.to_string(),
                                blob_name: grant.blob_name,
                            },
                        )
                        .await?;
                    print_json(&document)?;
                }
            }
        }
        Commands::Areas { sub } => match sub {
            AreaCommands::Import { file } => {
                let config = AdminConfig::from_env()?;
                let api = ApiClient::from_config(&config)?;
                upload_file(api, &file, "areas", &UploadConstraints::geo_areas()).await?;
            }
        },
    }

    Ok(())
}
