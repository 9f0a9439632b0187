use std::net::SocketAddrV4;

use bacwire_core::services::who_is::WhoIsRequest;
use bacwire_core::types::{
    ApplicationValue, LinkType, NetworkAddress, ObjectId, PropertyId, PropertyReference,
};
use bacwire_tools::{build_frame, parse_hex, LinkSpec, ObjectTypeArg, RequestSpec};
use clap::{Parser, Subcommand, ValueEnum};

/// Builds a BACnet request and prints the frame as hex.
#[derive(Parser, Debug)]
#[command(name = "bacencode")]
struct Args {
    #[arg(long, value_enum, default_value_t = LinkArg::Bip)]
    link: LinkArg,
    /// Originating address for a Forwarded-NPDU.
    #[arg(long)]
    origin: Option<SocketAddrV4>,
    #[arg(long, default_value_t = 255)]
    mstp_dest: u8,
    #[arg(long, default_value_t = 0)]
    mstp_src: u8,
    /// Route through the network layer to this network number.
    #[arg(long)]
    dnet: Option<u16>,
    /// Station MAC on `dnet` as hex; omit for a remote broadcast.
    #[arg(long, requires = "dnet")]
    dadr: Option<String>,
    #[arg(long, default_value_t = 1)]
    invoke_id: u8,
    #[command(subcommand)]
    request: RequestArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LinkArg {
    Bip,
    BipBroadcast,
    BipForwarded,
    Mstp,
    Npdu,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ValueKind {
    Null,
    Boolean,
    Unsigned,
    Signed,
    Real,
    Double,
    Enumerated,
    String,
}

#[derive(Subcommand, Debug)]
enum RequestArg {
    WhoIs {
        #[arg(long, requires = "high")]
        low: Option<u32>,
        #[arg(long, requires = "low")]
        high: Option<u32>,
    },
    ReadProperty {
        #[arg(long, value_enum)]
        object_type: ObjectTypeArg,
        #[arg(long)]
        instance: u32,
        /// Property identifier number (85 is present-value).
        #[arg(long, default_value_t = 85)]
        property: u32,
        #[arg(long)]
        index: Option<u32>,
    },
    WriteProperty {
        #[arg(long, value_enum)]
        object_type: ObjectTypeArg,
        #[arg(long)]
        instance: u32,
        #[arg(long, default_value_t = 85)]
        property: u32,
        #[arg(long)]
        index: Option<u32>,
        #[arg(long, value_enum)]
        kind: ValueKind,
        #[arg(long, default_value = "")]
        value: String,
        #[arg(long)]
        priority: Option<u8>,
    },
}

fn property(id: u32, index: Option<u32>) -> PropertyReference {
    PropertyReference {
        property_id: PropertyId::from_u32(id),
        array_index: index,
    }
}

fn parse_value(
    kind: ValueKind,
    text: &str,
) -> Result<ApplicationValue, Box<dyn std::error::Error>> {
    Ok(match kind {
        ValueKind::Null => ApplicationValue::Null,
        ValueKind::Boolean => ApplicationValue::Boolean(match text {
            "1" | "true" | "active" => true,
            "0" | "false" | "inactive" => false,
            other => return Err(format!("not a boolean: {other}").into()),
        }),
        ValueKind::Unsigned => ApplicationValue::Unsigned(text.parse()?),
        ValueKind::Signed => ApplicationValue::Signed(text.parse()?),
        ValueKind::Real => ApplicationValue::Real(text.parse()?),
        ValueKind::Double => ApplicationValue::Double(text.parse()?),
        ValueKind::Enumerated => ApplicationValue::Enumerated(text.parse()?),
        ValueKind::String => ApplicationValue::CharacterString(text.to_owned()),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let request = match args.request {
        RequestArg::WhoIs { low, high } => RequestSpec::WhoIs(match low.zip(high) {
            Some((low, high)) => WhoIsRequest::range(low, high),
            None => WhoIsRequest::global(),
        }),
        RequestArg::ReadProperty {
            object_type,
            instance,
            property: id,
            index,
        } => RequestSpec::read_property(
            ObjectId::new(object_type.into_object_type(), instance),
            property(id, index),
            args.invoke_id,
        ),
        RequestArg::WriteProperty {
            object_type,
            instance,
            property: id,
            index,
            kind,
            value,
            priority,
        } => RequestSpec::write_property(
            ObjectId::new(object_type.into_object_type(), instance),
            property(id, index),
            parse_value(kind, value.trim())?,
            priority,
            args.invoke_id,
        ),
    };

    let destination = match args.dnet {
        Some(net) => {
            let mac = match &args.dadr {
                Some(hex) => parse_hex(hex)?,
                None => Vec::new(),
            };
            let link_type = LinkType::from_mac_len(mac.len());
            Some(NetworkAddress::new(net, mac, link_type))
        }
        None => None,
    };

    let link = match args.link {
        LinkArg::Bip => LinkSpec::Bvlc { broadcast: false },
        LinkArg::BipBroadcast => LinkSpec::Bvlc { broadcast: true },
        LinkArg::BipForwarded => LinkSpec::BvlcForwarded {
            origin: args
                .origin
                .ok_or("--origin is required for a forwarded npdu")?,
        },
        LinkArg::Mstp => LinkSpec::Mstp {
            destination: args.mstp_dest,
            source: args.mstp_src,
        },
        LinkArg::Npdu => LinkSpec::Npdu,
    };

    match build_frame(&request, destination, link) {
        Ok(frame) => println!("{}", hex::encode(frame)),
        Err(e) => {
            eprintln!("encode failed: {e}");
            std::process::exit(1);
        }
    }
    Ok(())
}
