//! Composed sensor bus
//!
//! Boards wire up whichever acquisition paths they have and fill the rest
//! with the `No*` placeholders:
//!
//! ```ignore
//! let bus = Bus::new(adc, BitBangSync::new(cs, sck, so), NoLink);
//! let sensors = TempSensors::new(config, bus, heaters)?;
//! ```

use calor_core::traits::SensorBus;
use calor_core::Temperature;
use calor_hal::{AnalogInput, Channel, SyncSerialInput, TemperatureLink};

/// Analog input, clocked serial input and remote link behind one
/// [`SensorBus`]
pub struct Bus<A, S, L> {
    pub analog: A,
    pub sync: S,
    pub link: L,
}

impl<A, S, L> Bus<A, S, L> {
    pub const fn new(analog: A, sync: S, link: L) -> Self {
        Self { analog, sync, link }
    }
}

impl<A: AnalogInput, S: SyncSerialInput, L: TemperatureLink> SensorBus for Bus<A, S, L> {
    fn analog_read(&mut self, channel: u8) -> u16 {
        self.analog.analog_read(channel)
    }

    fn sync_read(&mut self, channel: u8) -> u16 {
        self.sync.sync_read(channel)
    }

    fn receive_reading(&mut self, channel: u8) -> u16 {
        self.link.receive_reading(channel)
    }

    fn send_target(&mut self, channel: u8, target: Temperature) {
        self.link.send_target(channel, target.quarters());
    }
}

/// No analog inputs; every channel reads 0
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnalog;

impl AnalogInput for NoAnalog {
    fn analog_read(&mut self, _channel: Channel) -> u16 {
        0
    }
}

/// No clocked serial devices
///
/// Reads all ones, like a floating data line, which decodes as an absent
/// amplifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSync;

impl SyncSerialInput for NoSync {
    fn sync_read(&mut self, _channel: Channel) -> u16 {
        0xFFFF
    }
}

/// No remote board; setpoints are dropped and readings are 0
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLink;

impl TemperatureLink for NoLink {
    fn send_target(&mut self, _channel: Channel, _quarters: u16) {}

    fn receive_reading(&mut self, _channel: Channel) -> u16 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calor_core::config::{ResidencyConfig, SensorConfig, SensorSetConfig};
    use calor_core::kind::SensorKind;
    use calor_core::traits::{HeaterId, HeaterTick};
    use calor_core::TempSensors;

    use crate::link::{encode_frame, UartLink};

    struct Adc([u16; 4]);

    impl AnalogInput for Adc {
        fn analog_read(&mut self, channel: Channel) -> u16 {
            self.0.get(usize::from(channel)).copied().unwrap_or(0)
        }
    }

    #[derive(Default)]
    struct Uart(std::vec::Vec<u8>);

    impl calor_hal::UartTx for Uart {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
            self.0.extend_from_slice(data);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct Heaters(std::vec::Vec<(HeaterId, Temperature)>);

    impl HeaterTick for Heaters {
        fn heater_tick(&mut self, heater: HeaterId, _: usize, current: Temperature, _: Temperature) {
            self.0.push((heater, current));
        }
    }

    #[test]
    fn test_placeholders() {
        let mut bus = Bus::new(NoAnalog, NoSync, NoLink);
        assert_eq!(bus.analog_read(3), 0);
        assert_eq!(bus.sync_read(0), 0xFFFF);
        assert_eq!(bus.receive_reading(1), 0);
        bus.send_target(1, Temperature::from_celsius(100));
    }

    #[test]
    fn test_no_sync_reads_as_absent() {
        let flags = calor_core::kind::thermocouple::decode_max6675(NoSync.sync_read(0)).flags;
        assert!(!flags.unwrap().present);
    }

    #[test]
    fn test_routes_by_path() {
        let mut bus = Bus::new(Adc([10, 20, 30, 40]), NoSync, NoLink);
        assert_eq!(bus.analog_read(2), 30);
        assert_eq!(bus.analog_read(9), 0);
    }

    #[test]
    fn test_full_stack() {
        let mut config = SensorSetConfig::new(ResidencyConfig::default());
        config
            .add_sensor(SensorConfig::new("extruder", SensorKind::Intercom, 1, Some(HeaterId(0))).unwrap())
            .unwrap();
        config
            .add_sensor(SensorConfig::new("bed", SensorKind::Ad595, 2, Some(HeaterId(1))).unwrap())
            .unwrap();

        let bus = Bus::new(Adc([0, 0, 512, 0]), NoSync, UartLink::new(Uart::default()));
        let mut sensors = TempSensors::new(config, bus, Heaters::default()).unwrap();

        sensors.init();
        sensors.set_target(0, Temperature::from_celsius(210));
        assert_eq!(
            sensors.bus().link.uart().0,
            [encode_frame(1, 0).as_slice(), encode_frame(1, 840).as_slice()].concat()
        );

        // remote board answers before the first tick
        sensors.bus_mut().link.feed_bytes(&encode_frame(1, 836));
        sensors.tick();

        assert_eq!(sensors.get_reading(0), Temperature::from_quarters(836));
        assert_eq!(sensors.get_reading(1), Temperature::from_celsius(250));
        assert_eq!(
            sensors.heaters().0,
            [
                (HeaterId(0), Temperature::from_quarters(836)),
                (HeaterId(1), Temperature::from_celsius(250)),
            ]
        );
    }
}
